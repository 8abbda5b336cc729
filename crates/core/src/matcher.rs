use crate::model::{Column, DatabaseModel, ForeignKey, Index, PrimaryKey, Table};
use crate::{DiffError, Result};

/// A source/target pairing produced by the matcher.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'a, T> {
    pub source: &'a T,
    pub target: &'a T,
}

/// Structural column predicate shared by fuzzy table matching and key,
/// foreign-key, and index pairing: upstream identity plus source type.
#[must_use]
pub fn columns_match(source: &Column, target: &Column) -> bool {
    source.model_name == target.model_name && source.source_type == target.source_type
}

/// Pairs tables across two models: first by upstream identity, then fuzzily
/// by column-set overlap over the unmatched remainder. The first acceptable
/// fuzzy pair wins and removes both sides from the pool.
#[must_use]
pub fn match_tables<'a>(source: &'a DatabaseModel, target: &'a DatabaseModel) -> Vec<Pair<'a, Table>> {
    let mut pairs = Vec::new();
    let mut matched_source = vec![false; source.tables.len()];
    let mut matched_target = vec![false; target.tables.len()];

    for (source_idx, source_table) in source.tables.iter().enumerate() {
        for (target_idx, target_table) in target.tables.iter().enumerate() {
            if matched_target[target_idx] || source_table.model_name != target_table.model_name {
                continue;
            }
            pairs.push(Pair {
                source: source_table,
                target: target_table,
            });
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            break;
        }
    }

    for (source_idx, source_table) in source.tables.iter().enumerate() {
        if matched_source[source_idx] {
            continue;
        }
        for (target_idx, target_table) in target.tables.iter().enumerate() {
            if matched_target[target_idx] || !tables_match_fuzzy(source_table, target_table) {
                continue;
            }
            pairs.push(Pair {
                source: source_table,
                target: target_table,
            });
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            break;
        }
    }

    pairs
}

/// Two tables fuzzy-match when at least 80% of their combined columns pair
/// structurally: `2·matches / (left + right) >= 4/5`, in integer form. Two
/// column-less tables never match (the ratio is undefined).
fn tables_match_fuzzy(source: &Table, target: &Table) -> bool {
    let total = source.columns.len() + target.columns.len();
    if total == 0 {
        return false;
    }

    let mut matches = 0usize;
    for source_column in &source.columns {
        for target_column in &target.columns {
            if columns_match(source_column, target_column) {
                matches += 1;
            }
        }
    }

    5 * 2 * matches >= 4 * total
}

/// Pairs columns of an already-paired table: first by upstream identity,
/// then fuzzily by database name plus source type.
#[must_use]
pub fn match_columns<'a>(source: &'a Table, target: &'a Table) -> Vec<Pair<'a, Column>> {
    let mut pairs = Vec::new();
    let mut matched_source = vec![false; source.columns.len()];
    let mut matched_target = vec![false; target.columns.len()];

    for (source_idx, source_column) in source.columns.iter().enumerate() {
        for (target_idx, target_column) in target.columns.iter().enumerate() {
            if matched_target[target_idx] || source_column.model_name != target_column.model_name {
                continue;
            }
            pairs.push(Pair {
                source: source_column,
                target: target_column,
            });
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            break;
        }
    }

    for (source_idx, source_column) in source.columns.iter().enumerate() {
        if matched_source[source_idx] {
            continue;
        }
        for (target_idx, target_column) in target.columns.iter().enumerate() {
            if matched_target[target_idx]
                || source_column.name != target_column.name
                || source_column.source_type != target_column.source_type
            {
                continue;
            }
            pairs.push(Pair {
                source: source_column,
                target: target_column,
            });
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            break;
        }
    }

    pairs
}

/// Pairs the primary keys of a paired table. Requires matching column lists
/// plus equal name and clustering.
#[must_use]
pub fn match_primary_keys<'a>(pair: &Pair<'a, Table>) -> Option<Pair<'a, PrimaryKey>> {
    let source_pk = pair.source.primary_key.as_ref()?;
    let target_pk = pair.target.primary_key.as_ref()?;

    if source_pk.name != target_pk.name || source_pk.clustered != target_pk.clustered {
        return None;
    }
    if !column_lists_match(pair.source, &source_pk.columns, pair.target, &target_pk.columns) {
        return None;
    }

    Some(Pair {
        source: source_pk,
        target: target_pk,
    })
}

/// Pairs foreign keys of a paired table by cross-product. The referenced
/// column lists are resolved through each side's model; a dangling
/// reference is an invariant violation.
pub fn match_foreign_keys<'a>(
    source_model: &'a DatabaseModel,
    target_model: &'a DatabaseModel,
    pair: &Pair<'a, Table>,
) -> Result<Vec<Pair<'a, ForeignKey>>> {
    let mut pairs = Vec::new();
    let mut matched_target = vec![false; pair.target.foreign_keys.len()];

    for source_fk in &pair.source.foreign_keys {
        for (target_idx, target_fk) in pair.target.foreign_keys.iter().enumerate() {
            if matched_target[target_idx] {
                continue;
            }
            if foreign_keys_match(source_model, target_model, pair, source_fk, target_fk)? {
                pairs.push(Pair {
                    source: source_fk,
                    target: target_fk,
                });
                matched_target[target_idx] = true;
                break;
            }
        }
    }

    Ok(pairs)
}

fn foreign_keys_match(
    source_model: &DatabaseModel,
    target_model: &DatabaseModel,
    pair: &Pair<'_, Table>,
    source_fk: &ForeignKey,
    target_fk: &ForeignKey,
) -> Result<bool> {
    if source_fk.unique != target_fk.unique
        || source_fk.required != target_fk.required
        || source_fk.cascade_delete != target_fk.cascade_delete
    {
        return Ok(false);
    }
    if !column_lists_match(pair.source, &source_fk.columns, pair.target, &target_fk.columns) {
        return Ok(false);
    }

    let source_referenced = referenced_table(source_model, source_fk, "source")?;
    let target_referenced = referenced_table(target_model, target_fk, "target")?;

    Ok(column_lists_match(
        source_referenced,
        &source_fk.referenced_columns,
        target_referenced,
        &target_fk.referenced_columns,
    ))
}

fn referenced_table<'a>(
    model: &'a DatabaseModel,
    fk: &ForeignKey,
    side: &str,
) -> Result<&'a Table> {
    model.table(&fk.referenced_table).ok_or_else(|| {
        DiffError::InvariantViolation {
            object: fk.referenced_table.to_string(),
            detail: format!(
                "table referenced by foreign key `{}` is missing from the {side} model",
                fk.name
            ),
        }
        .into()
    })
}

/// Pairs indexes of a paired table by cross-product: unique and clustering
/// flags must agree and the column lists must match structurally.
#[must_use]
pub fn match_indexes<'a>(pair: &Pair<'a, Table>) -> Vec<Pair<'a, Index>> {
    let mut pairs = Vec::new();
    let mut matched_target = vec![false; pair.target.indexes.len()];

    for source_index in &pair.source.indexes {
        for (target_idx, target_index) in pair.target.indexes.iter().enumerate() {
            if matched_target[target_idx]
                || source_index.unique != target_index.unique
                || source_index.clustered != target_index.clustered
                || !column_lists_match(
                    pair.source,
                    &source_index.columns,
                    pair.target,
                    &target_index.columns,
                )
            {
                continue;
            }
            pairs.push(Pair {
                source: source_index,
                target: target_index,
            });
            matched_target[target_idx] = true;
            break;
        }
    }

    pairs
}

/// Position-wise structural comparison of two column-reference lists. An
/// unresolved reference is treated as a non-match; real dangling references
/// are rejected upfront by model validation.
fn column_lists_match(
    source_table: &Table,
    source_columns: &[String],
    target_table: &Table,
    target_columns: &[String],
) -> bool {
    if source_columns.len() != target_columns.len() {
        return false;
    }

    source_columns
        .iter()
        .zip(target_columns)
        .all(|(source_name, target_name)| {
            match (source_table.column(source_name), target_table.column(target_name)) {
                (Some(source_column), Some(target_column)) => {
                    columns_match(source_column, target_column)
                }
                _ => false,
            }
        })
}
