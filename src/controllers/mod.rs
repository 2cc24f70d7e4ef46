//! Controllers del sistema
//!
//! Validan la entrada, delegan en servicios/repositorios y arman los DTOs
//! de respuesta.

pub mod assignment_controller;
pub mod availability_controller;
pub mod vehicle_driver_controller;
