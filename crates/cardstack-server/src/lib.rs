//! # Cardstack Server Library
//!
//! Logging setup and startup helpers for the Cardstack server binary.

pub mod logging;
pub mod startup;
