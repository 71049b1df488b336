//! REST API controllers.

pub mod card_controller;
pub mod health_controller;

pub use health_controller::HealthResponse;
