//! Pre-render rewrite of the operation stream: altering a column invalidates
//! any primary key, foreign key, or default constraint built on it, so each
//! `AlterColumn` gets the drop/re-add churn synthesized around it before
//! rendering.

use sqlshift_core::{
    Column, DatabaseModel, ForeignKey, GenerateError, MigrationOperation, OperationCollection,
    Result, SchemaQualifiedName, Table, flatten_operations,
};

/// Expands every `AlterColumn` in the stream with its companion operations
/// and re-flattens the whole batch in canonical order.
pub(crate) fn expand_alter_columns(
    source: &DatabaseModel,
    target: &DatabaseModel,
    operations: &[MigrationOperation],
) -> Result<Vec<MigrationOperation>> {
    let mut collection = OperationCollection::new();
    collection.extend(operations.iter().cloned());

    for operation in operations {
        let MigrationOperation::AlterColumn { table, column, .. } = operation else {
            continue;
        };
        synthesize_for_alter(source, target, operations, table, &column.name, &mut collection)?;
    }

    Ok(flatten_operations(&collection))
}

fn synthesize_for_alter(
    source: &DatabaseModel,
    target: &DatabaseModel,
    operations: &[MigrationOperation],
    table: &SchemaQualifiedName,
    column: &str,
    collection: &mut OperationCollection,
) -> Result<()> {
    let source_table_name = resolve_source_table_name(operations, table);
    let target_table_name = resolve_target_table_name(operations, table);
    let source_column_name = resolve_source_column_name(operations, table, column);
    let target_column_name = resolve_target_column_name(operations, table, column);

    let source_table = lookup_table(source, &source_table_name, "source")?;
    let target_table = lookup_table(target, &target_table_name, "target")?;
    let source_column = lookup_column(source_table, &source_column_name, "source")?;
    lookup_column(target_table, &target_column_name, "target")?;

    if let Some(pk) = &source_table.primary_key
        && pk.columns.contains(&source_column_name)
    {
        collection.add(MigrationOperation::DropPrimaryKey {
            table: table.clone(),
            name: pk.name.clone(),
        });
    }

    if let Some(pk) = &target_table.primary_key
        && pk.columns.contains(&target_column_name)
    {
        collection.add(MigrationOperation::AddPrimaryKey {
            table: table.clone(),
            name: pk.name.clone(),
            columns: pk.columns.clone(),
            clustered: pk.clustered,
        });
    }

    for owner in &source.tables {
        for fk in &owner.foreign_keys {
            if !fk_references_column(owner, fk, &source_table_name, &source_column_name) {
                continue;
            }
            collection.add(MigrationOperation::DropForeignKey {
                table: resolve_target_table_name(operations, &owner.name),
                name: fk.name.clone(),
            });
        }
    }

    for owner in &target.tables {
        for fk in &owner.foreign_keys {
            if !fk_references_column(owner, fk, &target_table_name, &target_column_name) {
                continue;
            }
            collection.add(MigrationOperation::AddForeignKey {
                table: owner.name.clone(),
                name: fk.name.clone(),
                columns: fk.columns.clone(),
                referenced_table: fk.referenced_table.clone(),
                referenced_columns: fk.referenced_columns.clone(),
                cascade_delete: fk.cascade_delete,
            });
        }
    }

    if source_column.has_default() {
        collection.add(MigrationOperation::DropDefaultConstraint {
            table: table.clone(),
            column: source_column_name,
        });
    }

    Ok(())
}

/// A foreign key is affected when the column is on its owning side or on the
/// side it references.
fn fk_references_column(
    owner: &Table,
    fk: &ForeignKey,
    table: &SchemaQualifiedName,
    column: &str,
) -> bool {
    (owner.name == *table && fk.columns.iter().any(|name| name == column))
        || (fk.referenced_table == *table
            && fk.referenced_columns.iter().any(|name| name == column))
}

/// Walks move/rename operations backwards to find the name a table had in
/// the source model.
fn resolve_source_table_name(
    operations: &[MigrationOperation],
    name: &SchemaQualifiedName,
) -> SchemaQualifiedName {
    let mut current = name.clone();
    for operation in operations.iter().rev() {
        match operation {
            MigrationOperation::RenameTable { table, new_name } => {
                if table.schema == current.schema && *new_name == current.name {
                    current = table.clone();
                }
            }
            MigrationOperation::MoveTable { table, new_schema } => {
                if *new_schema == current.schema && table.name == current.name {
                    current = table.clone();
                }
            }
            _ => {}
        }
    }
    current
}

/// Walks move/rename operations forwards to find the name a table carries in
/// the target model.
fn resolve_target_table_name(
    operations: &[MigrationOperation],
    name: &SchemaQualifiedName,
) -> SchemaQualifiedName {
    let mut current = name.clone();
    for operation in operations {
        match operation {
            MigrationOperation::RenameTable { table, new_name } => {
                if *table == current {
                    current = table.with_name(new_name);
                }
            }
            MigrationOperation::MoveTable { table, new_schema } => {
                if *table == current {
                    current = table.with_schema(new_schema);
                }
            }
            _ => {}
        }
    }
    current
}

/// Walks column renames backwards to find the name a column had in the
/// source model.
fn resolve_source_column_name(
    operations: &[MigrationOperation],
    table: &SchemaQualifiedName,
    column: &str,
) -> String {
    let mut current = column.to_string();
    for operation in operations.iter().rev() {
        if let MigrationOperation::RenameColumn { table: scope, from, to } = operation
            && scope == table
            && *to == current
        {
            current = from.clone();
        }
    }
    current
}

/// Forward walk over column renames. The rename stream is keyed by the
/// post-rename name here, so the walk re-assigns the name to itself; altered
/// columns already carry their target-model name.
fn resolve_target_column_name(
    operations: &[MigrationOperation],
    table: &SchemaQualifiedName,
    column: &str,
) -> String {
    let mut current = column.to_string();
    for operation in operations {
        if let MigrationOperation::RenameColumn { table: scope, to, .. } = operation
            && scope == table
            && *to == current
        {
            current = to.clone();
        }
    }
    current
}

fn lookup_table<'a>(
    model: &'a DatabaseModel,
    name: &SchemaQualifiedName,
    side: &str,
) -> Result<&'a Table> {
    model.table(name).ok_or_else(|| {
        GenerateError::InvariantViolation {
            object: name.to_string(),
            detail: format!("altered table is missing from the {side} model"),
        }
        .into()
    })
}

fn lookup_column<'a>(table: &'a Table, column: &str, side: &str) -> Result<&'a Column> {
    table.column(column).ok_or_else(|| {
        GenerateError::InvariantViolation {
            object: format!("{}.{column}", table.name),
            detail: format!("altered column is missing from the {side} model"),
        }
        .into()
    })
}
