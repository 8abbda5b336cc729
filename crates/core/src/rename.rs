use crate::collection::OperationCollection;
use crate::model::SchemaQualifiedName;
use crate::ops::{MigrationOperation, OperationKind};

/// Prefix of generated temporary names. Must not occur as a user identifier
/// in either model; guaranteeing that is the caller's responsibility.
pub const TEMP_NAME_PREFIX: &str = "__mig_tmp__";

/// Rewrites rename chains and swaps so that no rename collides with the old
/// name of a later rename in the same scope. For each such collision the
/// first rename is redirected to a fresh temporary name and a deferred
/// rename from the temporary to the intended name is appended after all
/// direct renames. A collision with more than one later rename is left
/// untouched. The counter is shared across all three rename kinds so
/// temporary names are globally unique.
pub fn resolve_transitive_renames(operations: &mut OperationCollection, temp_counter: &mut usize) {
    rewrite_table_renames(operations, temp_counter);
    rewrite_column_renames(operations, temp_counter);
    rewrite_index_renames(operations, temp_counter);
}

fn next_temp_name(temp_counter: &mut usize) -> String {
    let name = format!("{TEMP_NAME_PREFIX}{temp_counter}");
    *temp_counter += 1;
    name
}

fn rewrite_table_renames(operations: &mut OperationCollection, temp_counter: &mut usize) {
    let mut renames = operations.get(OperationKind::RenameTable).to_vec();
    let mut deferred = Vec::new();

    for idx in 0..renames.len() {
        let MigrationOperation::RenameTable { table, new_name } = &renames[idx] else {
            continue;
        };
        let (table, new_name) = (table.clone(), new_name.clone());
        let collision = table.with_name(&new_name);

        let later = renames[idx + 1..]
            .iter()
            .filter(|op| {
                matches!(op, MigrationOperation::RenameTable { table: t, .. } if *t == collision)
            })
            .count();
        if later != 1 {
            continue;
        }

        let temp = next_temp_name(temp_counter);
        // The deferred rename starts from the schema the table currently
        // has on the server; the new-name parameter stays bare.
        deferred.push(MigrationOperation::RenameTable {
            table: SchemaQualifiedName::new(&table.schema, &temp),
            new_name,
        });
        renames[idx] = MigrationOperation::RenameTable {
            table,
            new_name: temp,
        };
    }

    renames.extend(deferred);
    operations.replace(OperationKind::RenameTable, renames);
}

fn rewrite_column_renames(operations: &mut OperationCollection, temp_counter: &mut usize) {
    let mut renames = operations.get(OperationKind::RenameColumn).to_vec();
    let mut deferred = Vec::new();

    for idx in 0..renames.len() {
        let MigrationOperation::RenameColumn { table, from, to } = &renames[idx] else {
            continue;
        };
        let (table, from, to) = (table.clone(), from.clone(), to.clone());

        let later = renames[idx + 1..]
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    MigrationOperation::RenameColumn { table: t, from: f, .. }
                        if *t == table && *f == to
                )
            })
            .count();
        if later != 1 {
            continue;
        }

        let temp = next_temp_name(temp_counter);
        deferred.push(MigrationOperation::RenameColumn {
            table: table.clone(),
            from: temp.clone(),
            to,
        });
        renames[idx] = MigrationOperation::RenameColumn {
            table,
            from,
            to: temp,
        };
    }

    renames.extend(deferred);
    operations.replace(OperationKind::RenameColumn, renames);
}

fn rewrite_index_renames(operations: &mut OperationCollection, temp_counter: &mut usize) {
    let mut renames = operations.get(OperationKind::RenameIndex).to_vec();
    let mut deferred = Vec::new();

    for idx in 0..renames.len() {
        let MigrationOperation::RenameIndex { table, from, to } = &renames[idx] else {
            continue;
        };
        let (table, from, to) = (table.clone(), from.clone(), to.clone());

        let later = renames[idx + 1..]
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    MigrationOperation::RenameIndex { table: t, from: f, .. }
                        if *t == table && *f == to
                )
            })
            .count();
        if later != 1 {
            continue;
        }

        let temp = next_temp_name(temp_counter);
        deferred.push(MigrationOperation::RenameIndex {
            table: table.clone(),
            from: temp.clone(),
            to,
        });
        renames[idx] = MigrationOperation::RenameIndex {
            table,
            from,
            to: temp,
        };
    }

    renames.extend(deferred);
    operations.replace(OperationKind::RenameIndex, renames);
}
