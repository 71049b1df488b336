//! Domain entities.

pub mod card;

pub use card::*;
