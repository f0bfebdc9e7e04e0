pub mod booking_repository;
pub mod broadcast_repository;
pub mod deal_repository;
pub mod stats_repository;
pub mod vehicle_repository;
