use sqlshift_core::{
    Column, DatabaseModel, ForeignKey, Index, MigrationOperation, PrimaryKey, SchemaQualifiedName,
    Table, Value, diff,
};

fn qualified(schema: &str, name: &str) -> SchemaQualifiedName {
    SchemaQualifiedName::new(schema, name)
}

fn column(name: &str, source_type: &str) -> Column {
    Column::new(name, source_type, "int")
}

fn table_in(schema: &str, name: &str, columns: Vec<Column>) -> Table {
    let mut table = Table::named(qualified(schema, name));
    table.columns = columns;
    table
}

fn table(name: &str, columns: Vec<Column>) -> Table {
    table_in("dbo", name, columns)
}

fn model(tables: Vec<Table>) -> DatabaseModel {
    DatabaseModel::new(tables, Vec::new())
}

#[test]
fn identity_diff_is_empty() {
    let mut orders = table("Orders", vec![column("Id", "int"), column("Total", "decimal")]);
    orders.primary_key = Some(PrimaryKey {
        name: "PK_Orders".to_string(),
        columns: vec!["Id".to_string()],
        clustered: true,
    });
    orders.indexes.push(Index {
        name: "IX_Orders_Total".to_string(),
        columns: vec!["Total".to_string()],
        unique: false,
        clustered: false,
    });
    let snapshot = model(vec![orders]);

    let operations = diff(&snapshot, &snapshot.clone()).expect("diff should succeed");
    assert!(operations.is_empty());
}

#[test]
fn renamed_column_produces_single_rename() {
    let source = model(vec![table("T", vec![column("Foo", "int")])]);
    let mut renamed = column("Bar", "int");
    renamed.model_name = "Foo".to_string();
    let target = model(vec![table("T", vec![renamed])]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![MigrationOperation::RenameColumn {
            table: qualified("dbo", "T"),
            from: "Foo".to_string(),
            to: "Bar".to_string(),
        }]
    );
}

#[test]
fn added_not_null_column_with_default_emits_column_then_constraint() {
    let source = model(vec![table("T", vec![column("Id", "int")])]);
    let mut added = column("Y", "int");
    added.nullable = false;
    added.default_value = Some(Value::Integer(0));
    let target = model(vec![table("T", vec![column("Id", "int"), added.clone()])]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::AddColumn {
                table: qualified("dbo", "T"),
                column: added,
            },
            MigrationOperation::AddDefaultConstraint {
                table: qualified("dbo", "T"),
                column: "Y".to_string(),
                default_value: Some(Value::Integer(0)),
                default_sql: None,
            },
        ]
    );
}

#[test]
fn changed_nullability_is_a_destructive_alter() {
    let source = model(vec![table("T", vec![column("Id", "int")])]);
    let mut target_column = column("Id", "int");
    target_column.nullable = false;
    let target = model(vec![table("T", vec![target_column.clone()])]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![MigrationOperation::AlterColumn {
            table: qualified("dbo", "T"),
            column: target_column,
            destructive: true,
        }]
    );
}

#[test]
fn changed_default_drops_and_recreates_the_constraint() {
    let mut source_column = column("X", "int");
    source_column.default_value = Some(Value::Integer(1));
    let mut target_column = column("X", "int");
    target_column.default_value = Some(Value::Integer(2));
    let source = model(vec![table("T", vec![source_column])]);
    let target = model(vec![table("T", vec![target_column])]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::DropDefaultConstraint {
                table: qualified("dbo", "T"),
                column: "X".to_string(),
            },
            MigrationOperation::AddDefaultConstraint {
                table: qualified("dbo", "T"),
                column: "X".to_string(),
                default_value: Some(Value::Integer(2)),
                default_sql: None,
            },
        ]
    );
}

#[test]
fn schema_change_emits_move_then_rename_with_target_schema_on_the_old_name() {
    let source = model(vec![table_in("src", "T", vec![column("Id", "int")])]);
    let mut target_table = table_in("dst", "U", vec![column("Id", "int")]);
    target_table.model_name = "T".to_string();
    let target = model(vec![target_table]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::MoveTable {
                table: qualified("src", "T"),
                new_schema: "dst".to_string(),
            },
            MigrationOperation::RenameTable {
                table: qualified("dst", "T"),
                new_name: "U".to_string(),
            },
        ]
    );
}

#[test]
fn dropped_column_is_issued_against_the_target_table_name() {
    let source = model(vec![table(
        "T_old",
        vec![column("Keep", "int"), column("Gone", "int")],
    )]);
    let mut target_table = table("T", vec![column("Keep", "int")]);
    target_table.model_name = "T_old".to_string();
    let target = model(vec![target_table]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::DropColumn {
                table: qualified("dbo", "T"),
                column: "Gone".to_string(),
            },
            MigrationOperation::RenameTable {
                table: qualified("dbo", "T_old"),
                new_name: "T".to_string(),
            },
        ]
    );
}

#[test]
fn new_table_brings_its_foreign_keys_and_indexes() {
    let owners = table("Owners", vec![column("Id", "int")]);
    let mut pets = table("Pets", vec![column("Id", "int"), column("OwnerId", "int")]);
    pets.foreign_keys.push(ForeignKey {
        name: "FK_Pets_Owners".to_string(),
        columns: vec!["OwnerId".to_string()],
        referenced_table: qualified("dbo", "Owners"),
        referenced_columns: vec!["Id".to_string()],
        cascade_delete: true,
        unique: false,
        required: true,
    });
    pets.indexes.push(Index {
        name: "IX_Pets_OwnerId".to_string(),
        columns: vec!["OwnerId".to_string()],
        unique: false,
        clustered: false,
    });

    let source = model(vec![owners.clone()]);
    let target = model(vec![owners, pets.clone()]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::CreateTable { table: pets },
            MigrationOperation::AddForeignKey {
                table: qualified("dbo", "Pets"),
                name: "FK_Pets_Owners".to_string(),
                columns: vec!["OwnerId".to_string()],
                referenced_table: qualified("dbo", "Owners"),
                referenced_columns: vec!["Id".to_string()],
                cascade_delete: true,
            },
            MigrationOperation::CreateIndex {
                table: qualified("dbo", "Pets"),
                name: "IX_Pets_OwnerId".to_string(),
                columns: vec!["OwnerId".to_string()],
                unique: false,
                clustered: false,
            },
        ]
    );
}

#[test]
fn removed_table_is_dropped() {
    let source = model(vec![
        table("Keep", vec![column("Id", "int")]),
        table("Gone", vec![column("Id", "text")]),
    ]);
    let target = model(vec![table("Keep", vec![column("Id", "int")])]);

    let operations = diff(&source, &target).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![MigrationOperation::DropTable {
            table: qualified("dbo", "Gone"),
        }]
    );
}

#[test]
fn primary_key_clustering_change_drops_then_adds() {
    let make = |clustered: bool| {
        let mut t = table("T", vec![column("Id", "int")]);
        t.primary_key = Some(PrimaryKey {
            name: "PK_T".to_string(),
            columns: vec!["Id".to_string()],
            clustered,
        });
        model(vec![t])
    };

    let operations = diff(&make(true), &make(false)).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::DropPrimaryKey {
                table: qualified("dbo", "T"),
                name: "PK_T".to_string(),
            },
            MigrationOperation::AddPrimaryKey {
                table: qualified("dbo", "T"),
                name: "PK_T".to_string(),
                columns: vec!["Id".to_string()],
                clustered: false,
            },
        ]
    );
}

#[test]
fn renamed_index_produces_single_rename() {
    let make = |index_name: &str| {
        let mut t = table("T", vec![column("A", "int")]);
        t.indexes.push(Index {
            name: index_name.to_string(),
            columns: vec!["A".to_string()],
            unique: true,
            clustered: false,
        });
        model(vec![t])
    };

    let operations = diff(&make("IX_Old"), &make("IX_New")).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![MigrationOperation::RenameIndex {
            table: qualified("dbo", "T"),
            from: "IX_Old".to_string(),
            to: "IX_New".to_string(),
        }]
    );
}

#[test]
fn changed_foreign_key_flags_drop_and_recreate_it() {
    let make = |cascade_delete: bool| {
        let owners = table("Owners", vec![column("Id", "int")]);
        let mut pets = table("Pets", vec![column("OwnerId", "int")]);
        pets.foreign_keys.push(ForeignKey {
            name: "FK_Pets_Owners".to_string(),
            columns: vec!["OwnerId".to_string()],
            referenced_table: qualified("dbo", "Owners"),
            referenced_columns: vec!["Id".to_string()],
            cascade_delete,
            unique: false,
            required: true,
        });
        model(vec![owners, pets])
    };

    let operations = diff(&make(false), &make(true)).expect("diff should succeed");

    assert_eq!(
        operations,
        vec![
            MigrationOperation::DropForeignKey {
                table: qualified("dbo", "Pets"),
                name: "FK_Pets_Owners".to_string(),
            },
            MigrationOperation::AddForeignKey {
                table: qualified("dbo", "Pets"),
                name: "FK_Pets_Owners".to_string(),
                columns: vec!["OwnerId".to_string()],
                referenced_table: qualified("dbo", "Owners"),
                referenced_columns: vec!["Id".to_string()],
                cascade_delete: true,
            },
        ]
    );
}
