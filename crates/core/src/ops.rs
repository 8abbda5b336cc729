use crate::model::{Column, SchemaQualifiedName, Sequence, Table, Value};

/// The closed set of migration operations produced by the differ and
/// consumed by SQL generators.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOperation {
    CreateTable {
        table: Table,
    },
    DropTable {
        table: SchemaQualifiedName,
    },
    MoveTable {
        table: SchemaQualifiedName,
        new_schema: String,
    },
    RenameTable {
        table: SchemaQualifiedName,
        new_name: String,
    },
    AddColumn {
        table: SchemaQualifiedName,
        column: Column,
    },
    DropColumn {
        table: SchemaQualifiedName,
        column: String,
    },
    AlterColumn {
        table: SchemaQualifiedName,
        column: Column,
        destructive: bool,
    },
    RenameColumn {
        table: SchemaQualifiedName,
        from: String,
        to: String,
    },
    AddPrimaryKey {
        table: SchemaQualifiedName,
        name: String,
        columns: Vec<String>,
        clustered: bool,
    },
    DropPrimaryKey {
        table: SchemaQualifiedName,
        name: String,
    },
    AddForeignKey {
        table: SchemaQualifiedName,
        name: String,
        columns: Vec<String>,
        referenced_table: SchemaQualifiedName,
        referenced_columns: Vec<String>,
        cascade_delete: bool,
    },
    DropForeignKey {
        table: SchemaQualifiedName,
        name: String,
    },
    AddDefaultConstraint {
        table: SchemaQualifiedName,
        column: String,
        default_value: Option<Value>,
        default_sql: Option<String>,
    },
    DropDefaultConstraint {
        table: SchemaQualifiedName,
        column: String,
    },
    CreateIndex {
        table: SchemaQualifiedName,
        name: String,
        columns: Vec<String>,
        unique: bool,
        clustered: bool,
    },
    DropIndex {
        table: SchemaQualifiedName,
        name: String,
    },
    RenameIndex {
        table: SchemaQualifiedName,
        from: String,
        to: String,
    },
    CreateSequence {
        sequence: Sequence,
    },
    DropSequence {
        sequence: SchemaQualifiedName,
    },
}

/// Operation kinds in canonical emission order: destructive steps first,
/// then relocations and renames of surviving objects, then constructive
/// steps in dependency order. The declaration order IS the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    DropSequence = 1,
    DropIndex,
    DropForeignKey,
    DropPrimaryKey,
    DropDefaultConstraint,
    DropColumn,
    DropTable,
    MoveTable,
    RenameTable,
    RenameColumn,
    RenameIndex,
    CreateSequence,
    CreateTable,
    AddColumn,
    AlterColumn,
    AddDefaultConstraint,
    AddPrimaryKey,
    AddForeignKey,
    CreateIndex,
}

impl MigrationOperation {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateTable { .. } => OperationKind::CreateTable,
            Self::DropTable { .. } => OperationKind::DropTable,
            Self::MoveTable { .. } => OperationKind::MoveTable,
            Self::RenameTable { .. } => OperationKind::RenameTable,
            Self::AddColumn { .. } => OperationKind::AddColumn,
            Self::DropColumn { .. } => OperationKind::DropColumn,
            Self::AlterColumn { .. } => OperationKind::AlterColumn,
            Self::RenameColumn { .. } => OperationKind::RenameColumn,
            Self::AddPrimaryKey { .. } => OperationKind::AddPrimaryKey,
            Self::DropPrimaryKey { .. } => OperationKind::DropPrimaryKey,
            Self::AddForeignKey { .. } => OperationKind::AddForeignKey,
            Self::DropForeignKey { .. } => OperationKind::DropForeignKey,
            Self::AddDefaultConstraint { .. } => OperationKind::AddDefaultConstraint,
            Self::DropDefaultConstraint { .. } => OperationKind::DropDefaultConstraint,
            Self::CreateIndex { .. } => OperationKind::CreateIndex,
            Self::DropIndex { .. } => OperationKind::DropIndex,
            Self::RenameIndex { .. } => OperationKind::RenameIndex,
            Self::CreateSequence { .. } => OperationKind::CreateSequence,
            Self::DropSequence { .. } => OperationKind::DropSequence,
        }
    }

    /// Stable tag used in error messages.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }
}

impl OperationKind {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::DropSequence => "DropSequence",
            Self::DropIndex => "DropIndex",
            Self::DropForeignKey => "DropForeignKey",
            Self::DropPrimaryKey => "DropPrimaryKey",
            Self::DropDefaultConstraint => "DropDefaultConstraint",
            Self::DropColumn => "DropColumn",
            Self::DropTable => "DropTable",
            Self::MoveTable => "MoveTable",
            Self::RenameTable => "RenameTable",
            Self::RenameColumn => "RenameColumn",
            Self::RenameIndex => "RenameIndex",
            Self::CreateSequence => "CreateSequence",
            Self::CreateTable => "CreateTable",
            Self::AddColumn => "AddColumn",
            Self::AlterColumn => "AlterColumn",
            Self::AddDefaultConstraint => "AddDefaultConstraint",
            Self::AddPrimaryKey => "AddPrimaryKey",
            Self::AddForeignKey => "AddForeignKey",
            Self::CreateIndex => "CreateIndex",
        }
    }
}
