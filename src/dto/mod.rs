pub mod admin_dto;
pub mod booking_dto;
pub mod deal_dto;
pub mod response;
pub mod vehicle_dto;
