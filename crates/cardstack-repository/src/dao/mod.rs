//! Entity-level data access.

mod generic_dao;

pub use generic_dao::{CardDao, GenericDao};

use async_trait::async_trait;
use cardstack_core::{CardstackResult, Entity};

/// CRUD access for one entity type.
///
/// Every mutation must affect exactly one row; anything else is reported as
/// [`CardstackError::Persistence`](cardstack_core::CardstackError::Persistence).
#[async_trait]
pub trait Dao<T: Entity>: Send + Sync {
    /// Inserts an entity without identity and stores the generated one in place.
    async fn create(&self, entity: &mut T) -> CardstackResult<i64>;

    /// Reads the entity with `id`, or `None` when no row matches.
    async fn read(&self, id: i64) -> CardstackResult<Option<T>>;

    /// Updates every column of a persisted entity.
    async fn update(&self, entity: &T) -> CardstackResult<()>;

    /// Deletes the entity with `id`.
    async fn delete(&self, id: i64) -> CardstackResult<()>;
}
