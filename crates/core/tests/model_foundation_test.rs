use sqlshift_core::{
    Column, DatabaseModel, Error, ForeignKey, Index, ModelError, PrimaryKey, SchemaQualifiedName,
    Table, Value, validate_model, value_total_eq,
};

fn qualified(schema: &str, name: &str) -> SchemaQualifiedName {
    SchemaQualifiedName::new(schema, name)
}

fn table(name: &str, columns: Vec<Column>) -> Table {
    let mut table = Table::named(qualified("dbo", name));
    table.columns = columns;
    table
}

fn model(tables: Vec<Table>) -> DatabaseModel {
    DatabaseModel::new(tables, Vec::new())
}

#[test]
fn parses_schema_qualified_name() {
    let name = SchemaQualifiedName::parse("dbo.Orders").expect("parse should succeed");
    assert_eq!(name, qualified("dbo", "Orders"));
    assert_eq!(name.to_string(), "dbo.Orders");
}

#[test]
fn parse_splits_on_first_dot_only() {
    let name = SchemaQualifiedName::parse("dbo.My.Table").expect("parse should succeed");
    assert_eq!(name.schema, "dbo");
    assert_eq!(name.name, "My.Table");
}

#[test]
fn parse_rejects_unqualified_and_empty_parts() {
    for text in ["Orders", ".Orders", "dbo.", "."] {
        let error = SchemaQualifiedName::parse(text).expect_err("parse should fail");
        assert!(matches!(
            error,
            Error::Model(ModelError::InvalidInput { .. })
        ));
    }
}

#[test]
fn validate_accepts_consistent_model() {
    let mut orders = table("Orders", vec![Column::new("Id", "int", "int")]);
    orders.primary_key = Some(PrimaryKey {
        name: "PK_Orders".to_string(),
        columns: vec!["Id".to_string()],
        clustered: true,
    });
    orders.indexes.push(Index {
        name: "IX_Orders_Id".to_string(),
        columns: vec!["Id".to_string()],
        unique: false,
        clustered: false,
    });

    validate_model(&model(vec![orders]), "source").expect("validation should succeed");
}

#[test]
fn validate_rejects_duplicate_tables() {
    let duplicated = model(vec![table("Orders", Vec::new()), table("Orders", Vec::new())]);

    let error = validate_model(&duplicated, "source").expect_err("validation should fail");
    assert!(matches!(
        error,
        Error::Model(ModelError::InvariantViolation { .. })
    ));
}

#[test]
fn validate_rejects_unresolved_key_column() {
    let mut orders = table("Orders", vec![Column::new("Id", "int", "int")]);
    orders.primary_key = Some(PrimaryKey {
        name: "PK_Orders".to_string(),
        columns: vec!["Missing".to_string()],
        clustered: true,
    });

    let error = validate_model(&model(vec![orders]), "target").expect_err("validation should fail");
    assert!(matches!(
        error,
        Error::Model(ModelError::InvariantViolation { .. })
    ));
}

#[test]
fn validate_rejects_foreign_key_arity_mismatch() {
    let mut orders = table(
        "Orders",
        vec![
            Column::new("CustomerId", "int", "int"),
            Column::new("Region", "int", "int"),
        ],
    );
    orders.foreign_keys.push(ForeignKey {
        name: "FK_Orders_Customers".to_string(),
        columns: vec!["CustomerId".to_string(), "Region".to_string()],
        referenced_table: qualified("dbo", "Customers"),
        referenced_columns: vec!["Id".to_string()],
        cascade_delete: false,
        unique: false,
        required: true,
    });

    let error = validate_model(&model(vec![orders]), "source").expect_err("validation should fail");
    assert!(matches!(
        error,
        Error::Model(ModelError::InvariantViolation { .. })
    ));
}

#[test]
fn validate_rejects_empty_column_name() {
    let broken = model(vec![table("Orders", vec![Column::new("", "int", "int")])]);

    let error = validate_model(&broken, "source").expect_err("validation should fail");
    assert!(matches!(error, Error::Model(ModelError::InvalidInput { .. })));
}

#[test]
fn has_default_tracks_value_and_sql() {
    let mut column = Column::new("Total", "decimal", "decimal(18, 2)");
    assert!(!column.has_default());

    column.default_value = Some(Value::Integer(0));
    assert!(column.has_default());

    column.default_value = None;
    column.default_sql = Some("GETDATE()".to_string());
    assert!(column.has_default());
}

#[test]
fn value_equality_treats_floats_by_total_order() {
    assert!(value_total_eq(
        &Value::Float(f64::NAN),
        &Value::Float(f64::NAN)
    ));
    assert!(!value_total_eq(&Value::Float(0.5), &Value::Float(1.5)));
    assert!(value_total_eq(
        &Value::String("a".to_string()),
        &Value::String("a".to_string())
    ));
}
