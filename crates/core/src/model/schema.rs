use super::{SchemaQualifiedName, Value};
use crate::{ModelError, Result};

/// Snapshot of a whole database. Built upstream, read-only inside the core.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseModel {
    pub tables: Vec<Table>,
    pub sequences: Vec<Sequence>,
}

impl DatabaseModel {
    #[must_use]
    pub fn new(tables: Vec<Table>, sequences: Vec<Sequence>) -> Self {
        Self { tables, sequences }
    }

    #[must_use]
    pub fn table(&self, name: &SchemaQualifiedName) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == *name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: SchemaQualifiedName,
    /// Identity of the upstream entity this table was built from. The
    /// matcher's simple tier compares this, not the database name.
    pub model_name: String,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn named(name: SchemaQualifiedName) -> Self {
        let model_name = name.name.clone();
        Self {
            name,
            model_name,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueGeneration {
    #[default]
    None,
    OnInsert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Identity of the upstream property this column backs; defaults to the
    /// column name when the mapping does not rename it.
    pub model_name: String,
    /// Opaque source-type identity, compared byte-for-byte.
    pub source_type: String,
    /// Physical data type rendered into DDL.
    pub store_type: String,
    pub nullable: bool,
    pub value_generation: ValueGeneration,
    pub is_timestamp: bool,
    pub max_length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub is_fixed_length: bool,
    pub is_unicode: bool,
    pub default_value: Option<Value>,
    pub default_sql: Option<String>,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        source_type: impl Into<String>,
        store_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            model_name: name.clone(),
            name,
            source_type: source_type.into(),
            store_type: store_type.into(),
            nullable: true,
            value_generation: ValueGeneration::None,
            is_timestamp: false,
            max_length: None,
            precision: None,
            scale: None,
            is_fixed_length: false,
            is_unicode: false,
            default_value: None,
            default_sql: None,
        }
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || self.default_sql.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: String,
    pub columns: Vec<String>,
    pub clustered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: SchemaQualifiedName,
    pub referenced_columns: Vec<String>,
    pub cascade_delete: bool,
    pub unique: bool,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub clustered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: SchemaQualifiedName,
    pub store_type: String,
    pub start: i64,
    pub increment: i64,
}

/// Upfront invariant checks run before diffing. `side` names the model in
/// error messages (`source` or `target`).
pub fn validate_model(model: &DatabaseModel, side: &str) -> Result<()> {
    for (idx, table) in model.tables.iter().enumerate() {
        if table.name.schema.is_empty() || table.name.name.is_empty() {
            return Err(ModelError::InvalidInput {
                what: format!("{side} model contains a table with an empty name part"),
            }
            .into());
        }

        if model.tables[..idx]
            .iter()
            .any(|earlier| earlier.name == table.name)
        {
            return Err(invariant(
                &table.name,
                format!("duplicate table in {side} model"),
            ));
        }

        for column in &table.columns {
            if column.name.is_empty() {
                return Err(ModelError::InvalidInput {
                    what: format!("table `{}` contains a column with an empty name", table.name),
                }
                .into());
            }
        }

        if let Some(pk) = &table.primary_key {
            validate_column_refs(table, &pk.name, &pk.columns, side)?;
        }

        for fk in &table.foreign_keys {
            if fk.columns.len() != fk.referenced_columns.len() {
                return Err(invariant(
                    &table.name,
                    format!(
                        "foreign key `{}` has {} columns but references {}",
                        fk.name,
                        fk.columns.len(),
                        fk.referenced_columns.len()
                    ),
                ));
            }
            validate_column_refs(table, &fk.name, &fk.columns, side)?;
        }

        for index in &table.indexes {
            validate_column_refs(table, &index.name, &index.columns, side)?;
        }
    }

    Ok(())
}

fn validate_column_refs(
    table: &Table,
    owner_name: &str,
    columns: &[String],
    side: &str,
) -> Result<()> {
    for column in columns {
        if table.column(column).is_none() {
            return Err(invariant(
                &table.name,
                format!("`{owner_name}` references unknown column `{column}` in {side} model"),
            ));
        }
    }
    Ok(())
}

fn invariant(object: &SchemaQualifiedName, detail: String) -> crate::Error {
    ModelError::InvariantViolation {
        object: object.to_string(),
        detail,
    }
    .into()
}
