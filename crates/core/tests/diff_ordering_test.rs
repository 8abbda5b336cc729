use sqlshift_core::{
    Column, MigrationOperation, OperationCollection, OperationKind, SchemaQualifiedName, Sequence,
    Table, flatten_operations,
};

fn qualified(name: &str) -> SchemaQualifiedName {
    SchemaQualifiedName::new("dbo", name)
}

const CANONICAL_TAGS: [&str; 19] = [
    "DropSequence",
    "DropIndex",
    "DropForeignKey",
    "DropPrimaryKey",
    "DropDefaultConstraint",
    "DropColumn",
    "DropTable",
    "MoveTable",
    "RenameTable",
    "RenameColumn",
    "RenameIndex",
    "CreateSequence",
    "CreateTable",
    "AddColumn",
    "AlterColumn",
    "AddDefaultConstraint",
    "AddPrimaryKey",
    "AddForeignKey",
    "CreateIndex",
];

fn one_of_each_kind() -> Vec<MigrationOperation> {
    vec![
        MigrationOperation::DropSequence {
            sequence: qualified("SQ"),
        },
        MigrationOperation::DropIndex {
            table: qualified("T"),
            name: "IX".to_string(),
        },
        MigrationOperation::DropForeignKey {
            table: qualified("T"),
            name: "FK".to_string(),
        },
        MigrationOperation::DropPrimaryKey {
            table: qualified("T"),
            name: "PK".to_string(),
        },
        MigrationOperation::DropDefaultConstraint {
            table: qualified("T"),
            column: "C".to_string(),
        },
        MigrationOperation::DropColumn {
            table: qualified("T"),
            column: "C".to_string(),
        },
        MigrationOperation::DropTable {
            table: qualified("T"),
        },
        MigrationOperation::MoveTable {
            table: qualified("T"),
            new_schema: "dst".to_string(),
        },
        MigrationOperation::RenameTable {
            table: qualified("T"),
            new_name: "U".to_string(),
        },
        MigrationOperation::RenameColumn {
            table: qualified("T"),
            from: "A".to_string(),
            to: "B".to_string(),
        },
        MigrationOperation::RenameIndex {
            table: qualified("T"),
            from: "IX_A".to_string(),
            to: "IX_B".to_string(),
        },
        MigrationOperation::CreateSequence {
            sequence: Sequence {
                name: qualified("SQ"),
                store_type: "bigint".to_string(),
                start: 1,
                increment: 1,
            },
        },
        MigrationOperation::CreateTable {
            table: Table::named(qualified("T")),
        },
        MigrationOperation::AddColumn {
            table: qualified("T"),
            column: Column::new("C", "int", "int"),
        },
        MigrationOperation::AlterColumn {
            table: qualified("T"),
            column: Column::new("C", "int", "int"),
            destructive: true,
        },
        MigrationOperation::AddDefaultConstraint {
            table: qualified("T"),
            column: "C".to_string(),
            default_value: None,
            default_sql: Some("0".to_string()),
        },
        MigrationOperation::AddPrimaryKey {
            table: qualified("T"),
            name: "PK".to_string(),
            columns: vec!["C".to_string()],
            clustered: true,
        },
        MigrationOperation::AddForeignKey {
            table: qualified("T"),
            name: "FK".to_string(),
            columns: vec!["C".to_string()],
            referenced_table: qualified("U"),
            referenced_columns: vec!["Id".to_string()],
            cascade_delete: false,
        },
        MigrationOperation::CreateIndex {
            table: qualified("T"),
            name: "IX".to_string(),
            columns: vec!["C".to_string()],
            unique: false,
            clustered: false,
        },
    ]
}

#[test]
fn flatten_emits_kinds_in_canonical_order() {
    let mut collection = OperationCollection::new();
    for operation in one_of_each_kind().into_iter().rev() {
        collection.add(operation);
    }

    let tags: Vec<&str> = flatten_operations(&collection)
        .iter()
        .map(MigrationOperation::tag)
        .collect();

    assert_eq!(tags, CANONICAL_TAGS);
}

#[test]
fn flatten_preserves_insertion_order_within_a_kind() {
    let mut collection = OperationCollection::new();
    for name in ["First", "Second", "Third"] {
        collection.add(MigrationOperation::DropColumn {
            table: qualified("T"),
            column: name.to_string(),
        });
    }
    collection.add(MigrationOperation::DropTable {
        table: qualified("T"),
    });

    let flattened = flatten_operations(&collection);

    let columns: Vec<&str> = flattened
        .iter()
        .filter_map(|operation| match operation {
            MigrationOperation::DropColumn { column, .. } => Some(column.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(columns, ["First", "Second", "Third"]);
    assert!(matches!(
        flattened.last(),
        Some(MigrationOperation::DropTable { .. })
    ));
}

#[test]
fn collection_replace_swaps_a_whole_bucket() {
    let mut collection = OperationCollection::new();
    collection.add(MigrationOperation::DropColumn {
        table: qualified("T"),
        column: "A".to_string(),
    });

    collection.replace(
        OperationKind::DropColumn,
        vec![MigrationOperation::DropColumn {
            table: qualified("T"),
            column: "B".to_string(),
        }],
    );

    assert_eq!(collection.len(), 1);
    assert!(matches!(
        collection.get(OperationKind::DropColumn),
        [MigrationOperation::DropColumn { column, .. }] if column == "B"
    ));
}

#[test]
fn kind_ordering_matches_tag_table() {
    let operations = one_of_each_kind();
    let mut kinds: Vec<OperationKind> = operations.iter().map(MigrationOperation::kind).collect();
    kinds.sort();

    let tags: Vec<&str> = kinds.into_iter().map(OperationKind::tag).collect();
    assert_eq!(tags, CANONICAL_TAGS);
}
