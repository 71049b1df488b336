//! Core traits shared by the data access and client layers.

use std::fmt::Debug;

/// A persisted entity identified by a store-generated integer key.
///
/// The identity is absent until the store assigns one during creation and
/// must not change afterwards.
pub trait Entity: Debug + Send + Sync {
    /// Entity name used to derive statement names (`create<Name>`, `read<Name>`, ...).
    const ENTITY_NAME: &'static str;

    /// Returns the identity, if the entity has been persisted.
    fn id(&self) -> Option<i64>;

    /// Assigns the store-generated identity.
    fn set_id(&mut self, id: i64);

    /// Returns true once the entity carries an identity.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
