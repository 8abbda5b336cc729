use std::collections::BTreeSet;

use crate::Result;
use crate::collection::{OperationCollection, flatten_operations};
use crate::matcher::{self, Pair};
use crate::model::{
    Column, DatabaseModel, ForeignKey, Index, SchemaQualifiedName, Table, validate_model,
    value_total_eq,
};
use crate::ops::MigrationOperation;
use crate::rename::resolve_transitive_renames;

/// Compares a source and a target model and emits the ordered migration
/// operation stream that turns the source into the target.
pub fn diff(source: &DatabaseModel, target: &DatabaseModel) -> Result<Vec<MigrationOperation>> {
    Differ::new(source, target).diff()
}

/// Operations building every object of `model` from an empty database:
/// sequences, then tables, then foreign keys, then indexes.
#[must_use]
pub fn create_schema(model: &DatabaseModel) -> Vec<MigrationOperation> {
    let mut operations = OperationCollection::new();

    for sequence in &model.sequences {
        operations.add(MigrationOperation::CreateSequence {
            sequence: sequence.clone(),
        });
    }
    for table in &model.tables {
        operations.add(MigrationOperation::CreateTable {
            table: table.clone(),
        });
        for fk in &table.foreign_keys {
            operations.add(add_foreign_key_op(&table.name, fk));
        }
        for index in &table.indexes {
            operations.add(create_index_op(&table.name, index));
        }
    }

    flatten_operations(&operations)
}

/// Operations tearing every object of `model` down: sequences, then foreign
/// keys, then tables.
#[must_use]
pub fn drop_schema(model: &DatabaseModel) -> Vec<MigrationOperation> {
    let mut operations = OperationCollection::new();

    for sequence in &model.sequences {
        operations.add(MigrationOperation::DropSequence {
            sequence: sequence.name.clone(),
        });
    }
    for table in &model.tables {
        for fk in &table.foreign_keys {
            operations.add(MigrationOperation::DropForeignKey {
                table: table.name.clone(),
                name: fk.name.clone(),
            });
        }
        operations.add(MigrationOperation::DropTable {
            table: table.name.clone(),
        });
    }

    flatten_operations(&operations)
}

/// The model differ. Holds the two models and the working collection; a
/// fresh instance serves exactly one diff.
pub struct Differ<'a> {
    source: &'a DatabaseModel,
    target: &'a DatabaseModel,
    operations: OperationCollection,
    temp_counter: usize,
}

impl<'a> Differ<'a> {
    #[must_use]
    pub fn new(source: &'a DatabaseModel, target: &'a DatabaseModel) -> Self {
        Self {
            source,
            target,
            operations: OperationCollection::new(),
            temp_counter: 0,
        }
    }

    pub fn diff(mut self) -> Result<Vec<MigrationOperation>> {
        validate_model(self.source, "source")?;
        validate_model(self.target, "target")?;

        self.diff_sequences();

        let table_pairs = matcher::match_tables(self.source, self.target);
        self.diff_tables(&table_pairs);
        self.diff_primary_keys(&table_pairs);

        for pair in &table_pairs {
            let column_pairs = matcher::match_columns(pair.source, pair.target);
            self.diff_columns(pair, &column_pairs);
            self.diff_defaults(pair, &column_pairs);
            self.diff_foreign_keys(pair)?;
            self.diff_indexes(pair);
        }

        resolve_transitive_renames(&mut self.operations, &mut self.temp_counter);
        Ok(flatten_operations(&self.operations))
    }

    fn diff_sequences(&mut self) {
        // Sequence pairing is deferred; the pass is reserved so sequence
        // operations keep a stable place in the emission pipeline.
    }

    fn diff_tables(&mut self, table_pairs: &[Pair<'a, Table>]) {
        for pair in table_pairs {
            if pair.source.name.schema != pair.target.name.schema {
                self.operations.add(MigrationOperation::MoveTable {
                    table: pair.source.name.clone(),
                    new_schema: pair.target.name.schema.clone(),
                });
            }
            if pair.source.name.name != pair.target.name.name {
                // The move, if any, executes first, so the old name already
                // carries the target schema.
                self.operations.add(MigrationOperation::RenameTable {
                    table: SchemaQualifiedName::new(
                        &pair.target.name.schema,
                        &pair.source.name.name,
                    ),
                    new_name: pair.target.name.name.clone(),
                });
            }
        }

        let paired_sources: BTreeSet<&SchemaQualifiedName> =
            table_pairs.iter().map(|pair| &pair.source.name).collect();
        let paired_targets: BTreeSet<&SchemaQualifiedName> =
            table_pairs.iter().map(|pair| &pair.target.name).collect();

        for table in &self.target.tables {
            if paired_targets.contains(&table.name) {
                continue;
            }
            self.operations.add(MigrationOperation::CreateTable {
                table: table.clone(),
            });
            for fk in &table.foreign_keys {
                self.operations.add(add_foreign_key_op(&table.name, fk));
            }
            for index in &table.indexes {
                self.operations.add(create_index_op(&table.name, index));
            }
        }

        for table in &self.source.tables {
            if !paired_sources.contains(&table.name) {
                self.operations.add(MigrationOperation::DropTable {
                    table: table.name.clone(),
                });
            }
        }
    }

    fn diff_primary_keys(&mut self, table_pairs: &[Pair<'a, Table>]) {
        for pair in table_pairs {
            if matcher::match_primary_keys(pair).is_some() {
                continue;
            }
            if let Some(pk) = &pair.target.primary_key {
                self.operations.add(MigrationOperation::AddPrimaryKey {
                    table: pair.target.name.clone(),
                    name: pk.name.clone(),
                    columns: pk.columns.clone(),
                    clustered: pk.clustered,
                });
            }
            if let Some(pk) = &pair.source.primary_key {
                self.operations.add(MigrationOperation::DropPrimaryKey {
                    table: pair.target.name.clone(),
                    name: pk.name.clone(),
                });
            }
        }
    }

    fn diff_columns(&mut self, pair: &Pair<'a, Table>, column_pairs: &[Pair<'a, Column>]) {
        for column_pair in column_pairs {
            if column_pair.source.name != column_pair.target.name {
                self.operations.add(MigrationOperation::RenameColumn {
                    table: pair.target.name.clone(),
                    from: column_pair.source.name.clone(),
                    to: column_pair.target.name.clone(),
                });
            }
            if columns_differ(column_pair.source, column_pair.target) {
                // Data-loss analysis is not performed; every alteration is
                // conservatively destructive.
                self.operations.add(MigrationOperation::AlterColumn {
                    table: pair.target.name.clone(),
                    column: column_pair.target.clone(),
                    destructive: true,
                });
            }
        }

        let paired_sources: BTreeSet<&str> = column_pairs
            .iter()
            .map(|column_pair| column_pair.source.name.as_str())
            .collect();
        let paired_targets: BTreeSet<&str> = column_pairs
            .iter()
            .map(|column_pair| column_pair.target.name.as_str())
            .collect();

        for column in &pair.target.columns {
            if !paired_targets.contains(column.name.as_str()) {
                self.operations.add(MigrationOperation::AddColumn {
                    table: pair.target.name.clone(),
                    column: column.clone(),
                });
            }
        }

        for column in &pair.source.columns {
            if !paired_sources.contains(column.name.as_str()) {
                // Issued against the target table name: by execution time
                // the table already answers to it.
                self.operations.add(MigrationOperation::DropColumn {
                    table: pair.target.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
    }

    fn diff_defaults(&mut self, pair: &Pair<'a, Table>, column_pairs: &[Pair<'a, Column>]) {
        for column_pair in column_pairs {
            if defaults_match(column_pair.source, column_pair.target) {
                continue;
            }
            if column_pair.source.has_default() {
                self.operations.add(MigrationOperation::DropDefaultConstraint {
                    table: pair.target.name.clone(),
                    column: column_pair.source.name.clone(),
                });
            }
            if column_pair.target.has_default() {
                self.operations.add(add_default_op(&pair.target.name, column_pair.target));
            }
        }

        // Columns that only exist on the target side get their default as a
        // separate constraint right after the column itself.
        let paired_targets: BTreeSet<&str> = column_pairs
            .iter()
            .map(|column_pair| column_pair.target.name.as_str())
            .collect();
        for column in &pair.target.columns {
            if column.has_default() && !paired_targets.contains(column.name.as_str()) {
                self.operations.add(add_default_op(&pair.target.name, column));
            }
        }
    }

    fn diff_foreign_keys(&mut self, pair: &Pair<'a, Table>) -> Result<()> {
        let fk_pairs = matcher::match_foreign_keys(self.source, self.target, pair)?;

        let paired_sources: BTreeSet<&str> = fk_pairs
            .iter()
            .map(|fk_pair| fk_pair.source.name.as_str())
            .collect();
        let paired_targets: BTreeSet<&str> = fk_pairs
            .iter()
            .map(|fk_pair| fk_pair.target.name.as_str())
            .collect();

        for fk in &pair.target.foreign_keys {
            if !paired_targets.contains(fk.name.as_str()) {
                self.operations.add(add_foreign_key_op(&pair.target.name, fk));
            }
        }
        for fk in &pair.source.foreign_keys {
            if !paired_sources.contains(fk.name.as_str()) {
                self.operations.add(MigrationOperation::DropForeignKey {
                    table: pair.target.name.clone(),
                    name: fk.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn diff_indexes(&mut self, pair: &Pair<'a, Table>) {
        let index_pairs = matcher::match_indexes(pair);

        for index_pair in &index_pairs {
            if index_pair.source.name != index_pair.target.name {
                self.operations.add(MigrationOperation::RenameIndex {
                    table: pair.target.name.clone(),
                    from: index_pair.source.name.clone(),
                    to: index_pair.target.name.clone(),
                });
            }
        }

        let paired_sources: BTreeSet<&str> = index_pairs
            .iter()
            .map(|index_pair| index_pair.source.name.as_str())
            .collect();
        let paired_targets: BTreeSet<&str> = index_pairs
            .iter()
            .map(|index_pair| index_pair.target.name.as_str())
            .collect();

        for index in &pair.target.indexes {
            if !paired_targets.contains(index.name.as_str()) {
                self.operations.add(create_index_op(&pair.target.name, index));
            }
        }
        for index in &pair.source.indexes {
            if !paired_sources.contains(index.name.as_str()) {
                self.operations.add(MigrationOperation::DropIndex {
                    table: pair.target.name.clone(),
                    name: index.name.clone(),
                });
            }
        }
    }
}

/// Store-level differences that require an `AlterColumn`; defaults are
/// tracked separately as constraint operations.
fn columns_differ(source: &Column, target: &Column) -> bool {
    source.store_type != target.store_type
        || source.nullable != target.nullable
        || source.value_generation != target.value_generation
        || source.is_timestamp != target.is_timestamp
        || source.max_length != target.max_length
        || source.precision != target.precision
        || source.scale != target.scale
        || source.is_fixed_length != target.is_fixed_length
        || source.is_unicode != target.is_unicode
}

/// Two defaults match iff the value references are equal and the SQL
/// fragments are equal byte-for-byte.
fn defaults_match(source: &Column, target: &Column) -> bool {
    let values_equal = match (&source.default_value, &target.default_value) {
        (Some(source_value), Some(target_value)) => value_total_eq(source_value, target_value),
        (None, None) => true,
        _ => false,
    };
    values_equal && source.default_sql == target.default_sql
}

fn add_default_op(table: &SchemaQualifiedName, column: &Column) -> MigrationOperation {
    MigrationOperation::AddDefaultConstraint {
        table: table.clone(),
        column: column.name.clone(),
        default_value: column.default_value.clone(),
        default_sql: column.default_sql.clone(),
    }
}

fn add_foreign_key_op(table: &SchemaQualifiedName, fk: &ForeignKey) -> MigrationOperation {
    MigrationOperation::AddForeignKey {
        table: table.clone(),
        name: fk.name.clone(),
        columns: fk.columns.clone(),
        referenced_table: fk.referenced_table.clone(),
        referenced_columns: fk.referenced_columns.clone(),
        cascade_delete: fk.cascade_delete,
    }
}

fn create_index_op(table: &SchemaQualifiedName, index: &Index) -> MigrationOperation {
    MigrationOperation::CreateIndex {
        table: table.clone(),
        name: index.name.clone(),
        columns: index.columns.clone(),
        unique: index.unique,
        clustered: index.clustered,
    }
}
