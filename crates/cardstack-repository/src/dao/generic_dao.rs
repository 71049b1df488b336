//! Registry-driven DAO shared by every entity type.

use super::Dao;
use crate::executor::StatementExecutor;
use crate::mapper::{CardRowMapper, RowMapper};
use crate::sql::{BindParameters, SqlStatementRegistry};
use async_trait::async_trait;
use cardstack_core::{Card, CardstackError, CardstackResult, Entity};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

/// DAO for [`Card`].
pub type CardDao = GenericDao<Card, CardRowMapper>;

#[derive(Debug)]
struct StatementNames {
    create: String,
    read: String,
    update: String,
    delete: String,
}

impl StatementNames {
    fn for_entity(entity_name: &str) -> Self {
        Self {
            create: format!("create{}", entity_name),
            read: format!("read{}", entity_name),
            update: format!("update{}", entity_name),
            delete: format!("delete{}", entity_name),
        }
    }
}

/// Runs the `create<T>`, `read<T>`, `update<T>` and `delete<T>` statements
/// of the registry for entity `T`, converting through mapper `M`.
pub struct GenericDao<T, M> {
    registry: Arc<SqlStatementRegistry>,
    mapper: M,
    executor: Arc<dyn StatementExecutor>,
    names: StatementNames,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, M: RowMapper<T>> GenericDao<T, M> {
    /// Creates a DAO, failing with [`CardstackError::StatementNotFound`]
    /// unless all four CRUD statements for `T` are loaded.
    pub fn new(
        registry: Arc<SqlStatementRegistry>,
        mapper: M,
        executor: Arc<dyn StatementExecutor>,
    ) -> CardstackResult<Self> {
        let names = StatementNames::for_entity(T::ENTITY_NAME);
        registry.require(&[&names.create, &names.read, &names.update, &names.delete])?;

        Ok(Self {
            registry,
            mapper,
            executor,
            names,
            _entity: PhantomData,
        })
    }

    fn statement(&self, name: &str) -> CardstackResult<&str> {
        trace!("Resolving statement {} for {}", name, T::ENTITY_NAME);
        self.registry.get(name)
    }

    fn id_parameters(id: i64) -> BindParameters {
        BindParameters::new().with("id", id)
    }
}

impl CardDao {
    /// Creates a card DAO with the default [`CardRowMapper`].
    pub fn for_cards(
        registry: Arc<SqlStatementRegistry>,
        executor: Arc<dyn StatementExecutor>,
    ) -> CardstackResult<Self> {
        Self::new(registry, CardRowMapper::new(), executor)
    }
}

#[async_trait]
impl<T: Entity, M: RowMapper<T>> Dao<T> for GenericDao<T, M> {
    async fn create(&self, entity: &mut T) -> CardstackResult<i64> {
        if let Some(id) = entity.id() {
            return Err(CardstackError::invalid_argument(format!(
                "Cannot create {} that already has id {}",
                T::ENTITY_NAME,
                id
            )));
        }

        let sql = self.statement(&self.names.create)?;
        let params = self.mapper.to_parameters(entity);
        let outcome = self.executor.execute(sql, &params).await?;

        if outcome.rows_affected != 1 {
            return Err(CardstackError::persistence(format!(
                "Failed attempt to create {} {:?}: affected {} rows",
                T::ENTITY_NAME,
                entity,
                outcome.rows_affected
            )));
        }
        let id = outcome.generated_id.ok_or_else(|| {
            CardstackError::persistence(format!(
                "Failed attempt to create {} {:?}: no id was generated",
                T::ENTITY_NAME,
                entity
            ))
        })?;

        entity.set_id(id);
        debug!("Created {} with id {}", T::ENTITY_NAME, id);
        Ok(id)
    }

    async fn read(&self, id: i64) -> CardstackResult<Option<T>> {
        let sql = self.statement(&self.names.read)?;
        let mut rows = self.executor.query(sql, &Self::id_parameters(id)).await?;

        if rows.len() > 1 {
            return Err(CardstackError::persistence(format!(
                "Reading {} with id {} returned {} rows",
                T::ENTITY_NAME,
                id,
                rows.len()
            )));
        }

        let entity = rows.pop().map(|row| self.mapper.from_row(&row)).transpose()?;
        debug!(
            "Read {} with id {}: {}",
            T::ENTITY_NAME,
            id,
            if entity.is_some() { "found" } else { "absent" }
        );
        Ok(entity)
    }

    async fn update(&self, entity: &T) -> CardstackResult<()> {
        let Some(id) = entity.id() else {
            return Err(CardstackError::invalid_argument(format!(
                "Cannot update {} without id",
                T::ENTITY_NAME
            )));
        };

        let sql = self.statement(&self.names.update)?;
        let outcome = self
            .executor
            .execute(sql, &self.mapper.to_parameters(entity))
            .await?;

        match outcome.rows_affected {
            1 => {}
            0 => {
                return Err(CardstackError::persistence_not_found(format!(
                    "Failed attempt to update {} {:?}: no row with id {}",
                    T::ENTITY_NAME,
                    entity,
                    id
                )))
            }
            n => {
                return Err(CardstackError::persistence(format!(
                    "Failed attempt to update {} {:?}: affected {} rows",
                    T::ENTITY_NAME,
                    entity,
                    n
                )))
            }
        }

        debug!("Updated {} with id {}", T::ENTITY_NAME, id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> CardstackResult<()> {
        let sql = self.statement(&self.names.delete)?;
        let outcome = self.executor.execute(sql, &Self::id_parameters(id)).await?;

        match outcome.rows_affected {
            1 => {
                debug!("Deleted {} with id {}", T::ENTITY_NAME, id);
                Ok(())
            }
            0 => Err(CardstackError::persistence_not_found(format!(
                "Failed attempt to delete {} with id {}: not found",
                T::ENTITY_NAME,
                id
            ))),
            n => Err(CardstackError::persistence(format!(
                "Failed attempt to delete {} with id {}: affected {} rows",
                T::ENTITY_NAME,
                id,
                n
            ))),
        }
    }
}
