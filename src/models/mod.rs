pub mod booking;
pub mod broadcast;
pub mod deal;
pub mod vehicle;
