pub mod notifier;
pub mod payment_service;
pub mod pricing;
