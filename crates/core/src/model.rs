mod ident;
mod schema;
mod value;

pub use ident::SchemaQualifiedName;
pub use schema::{
    Column, DatabaseModel, ForeignKey, Index, PrimaryKey, Sequence, Table, ValueGeneration,
    validate_model,
};
pub use value::{Value, float_total_cmp, value_total_eq};
