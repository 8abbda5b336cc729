use std::fmt::Write as _;

use sqlshift_core::{
    Column, DatabaseModel, MigrationOperation, Result, SchemaQualifiedName, SqlBuilder,
    SqlGenerator, Value, ValueGeneration,
};

use crate::rewrite;

const DIALECT_NAME: &str = "mssql";

/// SQL Server flavored generator: bracket-quoted identifiers, `sp_rename`
/// invocations, named default constraints with runtime discovery on drop,
/// and a pre-render pass that synthesizes the key and constraint churn
/// around column alterations.
///
/// Holds both resolved models because the pre-render pass consults them.
/// Like every generator, an instance serves exactly one generation request.
pub struct MssqlGenerator<'a> {
    source: &'a DatabaseModel,
    target: &'a DatabaseModel,
    builder: SqlBuilder,
    variable_counter: usize,
}

impl<'a> MssqlGenerator<'a> {
    #[must_use]
    pub fn new(source: &'a DatabaseModel, target: &'a DatabaseModel) -> Self {
        Self {
            source,
            target,
            builder: SqlBuilder::new(),
            variable_counter: 0,
        }
    }

    fn next_variable(&mut self) -> String {
        let variable = format!("@var{}", self.variable_counter);
        self.variable_counter += 1;
        variable
    }
}

impl SqlGenerator for MssqlGenerator<'_> {
    fn dialect_name(&self) -> &'static str {
        DIALECT_NAME
    }

    fn builder(&mut self) -> &mut SqlBuilder {
        &mut self.builder
    }

    fn prepare_operations(
        &mut self,
        operations: &[MigrationOperation],
    ) -> Result<Vec<MigrationOperation>> {
        rewrite::expand_alter_columns(self.source, self.target, operations)
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        let mut literal = String::from("0x");
        for byte in bytes {
            write!(literal, "{byte:02X}").expect("writing to String should not fail");
        }
        literal
    }

    fn column_traits(&self, column: &Column) -> String {
        match column.value_generation {
            ValueGeneration::OnInsert => " IDENTITY".to_string(),
            ValueGeneration::None => String::new(),
        }
    }

    /// Clustered is the server default, so only the deviation is spelled.
    fn primary_key_traits(&self, clustered: bool) -> String {
        if clustered {
            String::new()
        } else {
            " NONCLUSTERED".to_string()
        }
    }

    fn index_traits(&self, clustered: bool) -> String {
        if clustered {
            " CLUSTERED".to_string()
        } else {
            String::new()
        }
    }

    fn move_table(&mut self, table: &SchemaQualifiedName, new_schema: &str) -> Result<()> {
        let sql = format!(
            "ALTER SCHEMA {} TRANSFER {}",
            self.quote_ident(new_schema),
            self.quote_qualified(table)
        );
        self.builder().append(sql);
        Ok(())
    }

    fn rename_table(&mut self, table: &SchemaQualifiedName, new_name: &str) -> Result<()> {
        let sql = sp_rename(&object_path(table), new_name, "OBJECT");
        self.builder().append(sql);
        Ok(())
    }

    fn rename_column(&mut self, table: &SchemaQualifiedName, from: &str, to: &str) -> Result<()> {
        let sql = sp_rename(&format!("{}.{from}", object_path(table)), to, "COLUMN");
        self.builder().append(sql);
        Ok(())
    }

    fn rename_index(&mut self, table: &SchemaQualifiedName, from: &str, to: &str) -> Result<()> {
        let sql = sp_rename(&format!("{}.{from}", object_path(table)), to, "INDEX");
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
            "ALTER TABLE {} ADD CONSTRAINT {} DEFAULT {} FOR {}",
            self.quote_qualified(table),
            self.quote_ident(&format!("DF_{}_{column}", table.name)),
            default,
            self.quote_ident(column)
        );
        self.builder().append(sql);
        Ok(())
    }

    /// The server names implicit default constraints itself, so the drop
    /// looks the name up in the catalog at execution time and feeds it into
    /// a dynamic `ALTER TABLE`.
    fn drop_default_constraint(&mut self, table: &SchemaQualifiedName, column: &str) -> Result<()> {
        let variable = self.next_variable();
        let table_path = n_literal(&object_path(table));
        let column_literal = n_literal(column);
        let quoted_table = self.quote_qualified(table);

        let builder = self.builder();
        builder.append_line(format!("DECLARE {variable} nvarchar(128)"));
        builder.append_line(format!(
            "SELECT {variable} = name FROM sys.default_constraints \
             WHERE parent_object_id = OBJECT_ID({table_path}) \
             AND COL_NAME(parent_object_id, parent_column_id) = {column_literal}"
        ));
        builder.append(format!(
            "EXECUTE('ALTER TABLE {quoted_table} DROP CONSTRAINT \"' + {variable} + '\"')"
        ));
        Ok(())
    }

    fn drop_index(&mut self, table: &SchemaQualifiedName, name: &str) -> Result<()> {
        let sql = format!(
            "DROP INDEX {} ON {}",
            self.quote_ident(name),
            self.quote_qualified(table)
        );
        self.builder().append(sql);
        Ok(())
    }
}

fn sp_rename(object_name: &str, new_name: &str, object_type: &str) -> String {
    format!(
        "EXECUTE sp_rename @objname = {}, @newname = {}, @objtype = {}",
        n_literal(object_name),
        n_literal(new_name),
        n_literal(object_type)
    )
}

/// Unquoted `schema.table` path used inside `sp_rename` and catalog-lookup
/// literals.
fn object_path(table: &SchemaQualifiedName) -> String {
    format!("{}.{}", table.schema, table.name)
}

fn n_literal(text: &str) -> String {
    format!("N'{}'", text.replace('\'', "''"))
}
