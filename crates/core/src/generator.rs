use std::fmt::Write as _;

use crate::builder::SqlBuilder;
use crate::model::{Column, SchemaQualifiedName, Sequence, Table, Value};
use crate::ops::MigrationOperation;
use crate::statement::SqlStatement;
use crate::{Error, GenerateError, Result};

/// Dialect-aware SQL generation over a migration-operation stream.
///
/// Every operation is rendered by its own visitor method; the provided
/// bodies implement a double-quoted ANSI dialect and serve as the base that
/// dialects override selectively. Quoting, column traits, primary-key and
/// index traits, and the pre-render operation rewrite are the extension
/// points.
///
/// A generator instance is single-use: it owns a mutable statement builder
/// (and, in some dialects, a variable counter), so construct a fresh
/// instance per generation request and do not share one across threads.
///
/// ```
/// use sqlshift_core::{AnsiSqlGenerator, MigrationOperation, SchemaQualifiedName, SqlGenerator};
///
/// let mut generator = AnsiSqlGenerator::new();
/// let operations = vec![MigrationOperation::DropTable {
///     table: SchemaQualifiedName::new("dbo", "Orders"),
/// }];
/// let statements = generator.generate(&operations).unwrap();
/// assert_eq!(statements[0].sql, "DROP TABLE \"dbo\".\"Orders\"");
/// ```
pub trait SqlGenerator {
    fn dialect_name(&self) -> &'static str;

    fn builder(&mut self) -> &mut SqlBuilder;

    /// Renders the stream into ordered statements. Operations that render
    /// nothing (dialect no-ops) produce no statement.
    fn generate(&mut self, operations: &[MigrationOperation]) -> Result<Vec<SqlStatement>> {
        let prepared = self.prepare_operations(operations)?;
        let mut statements = Vec::with_capacity(prepared.len());

        for operation in &prepared {
            self.visit(operation)?;
            let sql = self.builder().take();
            if !sql.is_empty() {
                statements.push(SqlStatement::new(sql));
            }
        }

        Ok(statements)
    }

    /// Hook run before rendering; dialects may rewrite the stream (e.g. to
    /// synthesize companion operations). The default keeps it as-is.
    fn prepare_operations(
        &mut self,
        operations: &[MigrationOperation],
    ) -> Result<Vec<MigrationOperation>> {
        Ok(operations.to_vec())
    }

    fn visit(&mut self, operation: &MigrationOperation) -> Result<()> {
        match operation {
            MigrationOperation::CreateTable { table } => self.create_table(table),
            MigrationOperation::DropTable { table } => self.drop_table(table),
            MigrationOperation::MoveTable { table, new_schema } => {
                self.move_table(table, new_schema)
            }
            MigrationOperation::RenameTable { table, new_name } => {
                self.rename_table(table, new_name)
            }
            MigrationOperation::AddColumn { table, column } => self.add_column(table, column),
            MigrationOperation::DropColumn { table, column } => self.drop_column(table, column),
            MigrationOperation::AlterColumn {
                table,
                column,
                destructive,
            } => self.alter_column(table, column, *destructive),
            MigrationOperation::RenameColumn { table, from, to } => {
                self.rename_column(table, from, to)
            }
            MigrationOperation::AddPrimaryKey {
                table,
                name,
                columns,
                clustered,
            } => self.add_primary_key(table, name, columns, *clustered),
            MigrationOperation::DropPrimaryKey { table, name } => {
                self.drop_primary_key(table, name)
            }
            MigrationOperation::AddForeignKey {
                table,
                name,
                columns,
                referenced_table,
                referenced_columns,
                cascade_delete,
            } => self.add_foreign_key(
                table,
                name,
                columns,
                referenced_table,
                referenced_columns,
                *cascade_delete,
            ),
            MigrationOperation::DropForeignKey { table, name } => {
                self.drop_foreign_key(table, name)
            }
            MigrationOperation::AddDefaultConstraint {
                table,
                column,
                default_value,
                default_sql,
            } => self.add_default_constraint(
                table,
                column,
                default_value.as_ref(),
                default_sql.as_deref(),
            ),
            MigrationOperation::DropDefaultConstraint { table, column } => {
                self.drop_default_constraint(table, column)
            }
            MigrationOperation::CreateIndex {
                table,
                name,
                columns,
                unique,
                clustered,
            } => self.create_index(table, name, columns, *unique, *clustered),
            MigrationOperation::DropIndex { table, name } => self.drop_index(table, name),
            MigrationOperation::RenameIndex { table, from, to } => {
                self.rename_index(table, from, to)
            }
            MigrationOperation::CreateSequence { sequence } => self.create_sequence(sequence),
            MigrationOperation::DropSequence { sequence } => self.drop_sequence(sequence),
        }
    }

    // --- quoting -----------------------------------------------------------

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn quote_qualified(&self, name: &SchemaQualifiedName) -> String {
        format!(
            "{}.{}",
            self.quote_ident(&name.schema),
            self.quote_ident(&name.name)
        )
    }

    fn quote_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn quote_column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // --- literals and traits ----------------------------------------------

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        let mut literal = String::from("X'");
        for byte in bytes {
            write!(literal, "{byte:02X}").expect("writing to String should not fail");
        }
        literal.push('\'');
        literal
    }

    fn render_value(&self, value: &Value) -> String {
        match value {
            Value::String(text) => self.quote_literal(text),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Bool(value) => self.boolean_literal(*value).to_string(),
            Value::Bytes(bytes) => self.bytes_literal(bytes),
        }
    }

    fn default_expression(&self, value: Option<&Value>, sql: Option<&str>) -> Option<String> {
        sql.map(str::to_string)
            .or_else(|| value.map(|value| self.render_value(value)))
    }

    /// Extra clauses appended to a column definition (identity and friends).
    /// The base dialect appends nothing.
    fn column_traits(&self, _column: &Column) -> String {
        String::new()
    }

    /// Extra clauses appended to `PRIMARY KEY` (clustering and friends).
    fn primary_key_traits(&self, _clustered: bool) -> String {
        String::new()
    }

    /// Extra clauses injected into `CREATE INDEX` (clustering and friends).
    fn index_traits(&self, _clustered: bool) -> String {
        String::new()
    }

    fn column_definition(&self, column: &Column, include_default: bool) -> String {
        let mut definition = format!("{} {}", self.quote_ident(&column.name), column.store_type);

        if include_default
            && let Some(default) = self.default_expression(
                column.default_value.as_ref(),
                column.default_sql.as_deref(),
            )
        {
            write!(definition, " DEFAULT {default}").expect("writing to String should not fail");
        }

        definition.push_str(&self.column_traits(column));

        if !column.nullable {
            definition.push_str(" NOT NULL");
        }

        definition
    }

    // --- visitors ----------------------------------------------------------

    fn create_table(&mut self, table: &Table) -> Result<()> {
        let name = self.quote_qualified(&table.name);
        let mut definitions: Vec<String> = table
            .columns
            .iter()
            .map(|column| self.column_definition(column, true))
            .collect();

        if let Some(pk) = &table.primary_key {
            definitions.push(format!(
                "CONSTRAINT {} PRIMARY KEY{} ({})",
                self.quote_ident(&pk.name),
                self.primary_key_traits(pk.clustered),
                self.quote_column_list(&pk.columns)
            ));
        }

        let builder = self.builder();
        builder.append_line(format!("CREATE TABLE {name} ("));
        builder.indent();
        let last = definitions.len().saturating_sub(1);
        for (idx, definition) in definitions.iter().enumerate() {
            if idx < last {
                builder.append_line(format!("{definition},"));
            } else {
                builder.append_line(definition);
            }
        }
        builder.outdent();
        builder.append(")");
        Ok(())
    }

    fn drop_table(&mut self, table: &SchemaQualifiedName) -> Result<()> {
        let sql = format!("DROP TABLE {}", self.quote_qualified(table));
        self.builder().append(sql);
        Ok(())
    }

    /// Relocating a table between schemas has no portable SQL; the base
    /// dialect renders nothing.
    fn move_table(&mut self, _table: &SchemaQualifiedName, _new_schema: &str) -> Result<()> {
        Ok(())
    }

    fn rename_table(&mut self, _table: &SchemaQualifiedName, _new_name: &str) -> Result<()> {
        Err(self.unsupported("RenameTable"))
    }

    fn add_column(&mut self, table: &SchemaQualifiedName, column: &Column) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} ADD {}",
            self.quote_qualified(table),
            self.column_definition(column, false)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn drop_column(&mut self, table: &SchemaQualifiedName, column: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_qualified(table),
            self.quote_ident(column)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn alter_column(
        &mut self,
        table: &SchemaQualifiedName,
        column: &Column,
        _destructive: bool,
    ) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} {}{}{}",
            self.quote_qualified(table),
            self.quote_ident(&column.name),
            column.store_type,
            self.column_traits(column),
            if column.nullable { " NULL" } else { " NOT NULL" }
        );
        self.builder().append(sql);
        Ok(())
    }

    fn rename_column(&mut self, _table: &SchemaQualifiedName, _from: &str, _to: &str) -> Result<()> {
        Err(self.unsupported("RenameColumn"))
    }

    fn add_primary_key(
        &mut self,
        table: &SchemaQualifiedName,
        name: &str,
        columns: &[String],
        clustered: bool,
    ) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY{} ({})",
            self.quote_qualified(table),
            self.quote_ident(name),
            self.primary_key_traits(clustered),
            self.quote_column_list(columns)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn drop_primary_key(&mut self, table: &SchemaQualifiedName, name: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_qualified(table),
            self.quote_ident(name)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn add_foreign_key(
        &mut self,
        table: &SchemaQualifiedName,
        name: &str,
        columns: &[String],
        referenced_table: &SchemaQualifiedName,
        referenced_columns: &[String],
        cascade_delete: bool,
    ) -> Result<()> {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_qualified(table),
            self.quote_ident(name),
            self.quote_column_list(columns),
            self.quote_qualified(referenced_table),
            self.quote_column_list(referenced_columns)
        );
        if cascade_delete {
            sql.push_str(" ON DELETE CASCADE");
        }
        self.builder().append(sql);
        Ok(())
    }

    fn drop_foreign_key(&mut self, table: &SchemaQualifiedName, name: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_qualified(table),
            self.quote_ident(name)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn add_default_constraint(
        &mut self,
        table: &SchemaQualifiedName,
        column: &str,
        default_value: Option<&Value>,
        default_sql: Option<&str>,
    ) -> Result<()> {
        let default = self
            .default_expression(default_value, default_sql)
            .unwrap_or_else(|| "NULL".to_string());
        let sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
            self.quote_qualified(table),
            self.quote_ident(column),
            default
        );
        self.builder().append(sql);
        Ok(())
    }

    fn drop_default_constraint(&mut self, table: &SchemaQualifiedName, column: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
            self.quote_qualified(table),
            self.quote_ident(column)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn create_index(
        &mut self,
        table: &SchemaQualifiedName,
        name: &str,
        columns: &[String],
        unique: bool,
        clustered: bool,
    ) -> Result<()> {
        let sql = format!(
            "CREATE{}{} INDEX {} ON {} ({})",
            if unique { " UNIQUE" } else { "" },
            self.index_traits(clustered),
            self.quote_ident(name),
            self.quote_qualified(table),
            self.quote_column_list(columns)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn drop_index(&mut self, _table: &SchemaQualifiedName, name: &str) -> Result<()> {
        let sql = format!("DROP INDEX {}", self.quote_ident(name));
        self.builder().append(sql);
        Ok(())
    }

    fn rename_index(&mut self, _table: &SchemaQualifiedName, _from: &str, _to: &str) -> Result<()> {
        Err(self.unsupported("RenameIndex"))
    }

    fn create_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        let sql = format!(
            "CREATE SEQUENCE {} AS {} START WITH {} INCREMENT BY {}",
            self.quote_qualified(&sequence.name),
            sequence.store_type,
            sequence.start,
            sequence.increment
        );
        self.builder().append(sql);
        Ok(())
    }

    fn drop_sequence(&mut self, sequence: &SchemaQualifiedName) -> Result<()> {
        let sql = format!("DROP SEQUENCE {}", self.quote_qualified(sequence));
        self.builder().append(sql);
        Ok(())
    }

    // --- error helpers ------------------------------------------------------

    fn unsupported(&self, operation: &str) -> Error {
        GenerateError::UnsupportedDialectFeature {
            operation: operation.to_string(),
            dialect: self.dialect_name().to_string(),
        }
        .into()
    }

    /// Fallback for dialects that rewrite streams and meet an operation they
    /// cannot process.
    fn unhandled(&self, operation: &MigrationOperation) -> Error {
        GenerateError::UnhandledOperation {
            operation: operation.tag().to_string(),
            dialect: self.dialect_name().to_string(),
        }
        .into()
    }
}

/// The default double-quoted dialect: exactly the base visitor bodies, no
/// overrides.
#[derive(Debug, Default)]
pub struct AnsiSqlGenerator {
    builder: SqlBuilder,
}

impl AnsiSqlGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SqlGenerator for AnsiSqlGenerator {
    fn dialect_name(&self) -> &'static str {
        "ansi"
    }

    fn builder(&mut self) -> &mut SqlBuilder {
        &mut self.builder
    }
}
