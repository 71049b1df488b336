//! # Cardstack Resilience
//!
//! Resilience patterns for Cardstack.
//! Provides a fixed-backoff retry policy and call deadlines.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
