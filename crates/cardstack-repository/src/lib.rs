//! # Cardstack Repository
//!
//! Data access for Cardstack, layered as:
//!
//! ```text
//! Caller
//!   ↓  Arc<dyn Dao<Card>>         (entity-level CRUD)
//! GenericDao<T, M>                (statement lookup + affected-row checks)
//!   ↓  RowMapper<T>               (entity ↔ named parameters / rows)
//!   ↓  Arc<dyn StatementExecutor> (named SQL execution)
//! MySqlStatementExecutor          (MySQL / SQLx)
//!   ↓
//! MySQL
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   sql/
//!     registry.rs     ← SqlStatementRegistry
//!     parser.rs       ← statement-file grammar
//!     named.rs        ← :name → ? placeholder rewriting
//!     value.rs        ← SqlValue, BindParameters, Row
//!   executor/
//!     mod.rs          ← StatementExecutor trait
//!     mysql.rs        ← MySqlStatementExecutor
//!   mapper/
//!     mod.rs          ← RowMapper trait
//!     card_mapper.rs  ← CardRowMapper
//!   dao/
//!     mod.rs          ← Dao trait
//!     generic_dao.rs  ← GenericDao, CardDao
//!   pool.rs           ← DatabasePool
//! ```

pub mod dao;
pub mod executor;
pub mod mapper;
pub mod pool;
pub mod sql;

pub use dao::*;
pub use executor::*;
pub use mapper::*;
pub use pool::*;
pub use sql::*;
