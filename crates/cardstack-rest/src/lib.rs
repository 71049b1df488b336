//! # Cardstack REST
//!
//! REST API layer using Axum for Cardstack.
//! Exposes the card CRUD surface under `/service/card` and health checks.

pub mod controllers;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
