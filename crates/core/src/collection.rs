use std::collections::BTreeMap;

use crate::ops::{MigrationOperation, OperationKind};

/// Multi-bucket operation container indexed by kind. Insertion order is
/// preserved within a kind; cross-kind ordering is the concern of
/// [`flatten_operations`], not of the collection.
#[derive(Debug, Clone, Default)]
pub struct OperationCollection {
    buckets: BTreeMap<OperationKind, Vec<MigrationOperation>>,
}

impl OperationCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, operation: MigrationOperation) {
        self.buckets
            .entry(operation.kind())
            .or_default()
            .push(operation);
    }

    pub fn extend(&mut self, operations: impl IntoIterator<Item = MigrationOperation>) {
        for operation in operations {
            self.add(operation);
        }
    }

    #[must_use]
    pub fn get(&self, kind: OperationKind) -> &[MigrationOperation] {
        self.buckets.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Replaces the whole bucket for `kind`. Operations of a different kind
    /// in `operations` are debug-asserted against and dropped into their own
    /// buckets.
    pub fn replace(&mut self, kind: OperationKind, operations: Vec<MigrationOperation>) {
        self.buckets.remove(&kind);
        for operation in operations {
            debug_assert_eq!(operation.kind(), kind);
            self.add(operation);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Flattens the collection in canonical kind order, preserving insertion
/// order within each kind.
#[must_use]
pub fn flatten_operations(collection: &OperationCollection) -> Vec<MigrationOperation> {
    let mut flattened = Vec::with_capacity(collection.len());
    for bucket in collection.buckets.values() {
        flattened.extend(bucket.iter().cloned());
    }
    flattened
}
