//! Result type aliases for Cardstack.

use crate::CardstackError;

/// A specialized `Result` type for Cardstack operations.
pub type CardstackResult<T> = Result<T, CardstackError>;
