pub mod admin_controller;
pub mod booking_controller;
pub mod deal_controller;
pub mod vehicle_controller;
