//! Routers de la API
//!
//! Cada agregado expone su propio router; los handlers son finos y
//! delegan toda la lógica en los controllers.

pub mod admin_routes;
pub mod booking_routes;
pub mod deal_routes;
pub mod vehicle_routes;
