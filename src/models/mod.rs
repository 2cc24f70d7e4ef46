//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod assignment;
pub mod availability;
pub mod employee;
pub mod vehicle_driver;
