//! # Cardstack Core
//!
//! Core types, traits, and error definitions for Cardstack.
//! This crate provides the entity model and the error taxonomy shared by
//! the repository, client, and REST layers.

pub mod domain;
pub mod error;
pub mod result;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use result::*;
pub use traits::*;
