pub mod assignment_routes;
pub mod availability_routes;
pub mod vehicle_driver_routes;
