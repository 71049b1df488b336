//! Entity ↔ column mapping.

mod card_mapper;

pub use card_mapper::CardRowMapper;

use crate::sql::{BindParameters, Row};
use cardstack_core::CardstackResult;

/// Bidirectional conversion between an entity and its columns.
///
/// Placeholder names produced by [`to_parameters`](Self::to_parameters) are
/// the column names read by [`from_row`](Self::from_row).
pub trait RowMapper<T>: Send + Sync {
    /// Converts every persisted field, identity included (`Null` when absent).
    fn to_parameters(&self, entity: &T) -> BindParameters;

    /// Builds an entity from a row holding every mapped column.
    fn from_row(&self, row: &Row) -> CardstackResult<T>;
}
