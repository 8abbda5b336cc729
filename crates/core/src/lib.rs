mod builder;
mod collection;
mod differ;
mod error;
mod generator;
mod matcher;
mod model;
mod ops;
mod rename;
mod statement;

pub use builder::SqlBuilder;
pub use collection::{OperationCollection, flatten_operations};
pub use differ::{Differ, create_schema, diff, drop_schema};
pub use error::{DiffError, Error, GenerateError, ModelError, Result};
pub use generator::{AnsiSqlGenerator, SqlGenerator};
pub use matcher::{
    Pair, columns_match, match_columns, match_foreign_keys, match_indexes, match_primary_keys,
    match_tables,
};
pub use model::{
    Column, DatabaseModel, ForeignKey, Index, PrimaryKey, SchemaQualifiedName, Sequence, Table,
    Value, ValueGeneration, float_total_cmp, validate_model, value_total_eq,
};
pub use ops::{MigrationOperation, OperationKind};
pub use rename::{TEMP_NAME_PREFIX, resolve_transitive_renames};
pub use statement::SqlStatement;
