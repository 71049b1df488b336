//! Named SQL statements: loading, parameter values and placeholder binding.

mod named;
mod parser;
mod registry;
mod value;

pub use named::{bind_named, NamedStatement};
pub use parser::{parse_statements, ParsedStatement};
pub use registry::{SqlStatementRegistry, StatementDefinition};
pub use value::{BindParameters, Row, SqlValue};
