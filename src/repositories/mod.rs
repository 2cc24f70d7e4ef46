//! Repositorios de acceso a datos
//!
//! Este módulo contiene el acceso a PostgreSQL: el libro mayor de
//! asignaciones, el almacén de disponibilidad y los vínculos
//! vehículo-conductor.

pub mod assignment_repository;
pub mod availability_repository;
pub mod vehicle_driver_repository;
