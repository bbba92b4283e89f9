//! Error types for GrainDB
//!
//! This module defines all error types used throughout the database engine.

use crate::catalog::ColumnType;
use thiserror::Error;

/// The main error type for GrainDB
///
/// Error messages are returned verbatim to callers (the REPL prints them
/// after an `Error: ` prefix), so the bodies here are part of the engine's
/// compatibility surface.
#[derive(Error, Debug)]
pub enum Error {
    // ========== Statement Errors ==========
    #[error("empty SQL statement")]
    EmptyStatement,

    #[error("unsupported SQL command")]
    UnsupportedCommand,

    // ========== Column Definition Errors ==========
    #[error("invalid column definition")]
    InvalidColumnDefinition,

    #[error("invalid column type")]
    InvalidColumnType,

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("invalid foreign key reference")]
    InvalidForeignKeyReference,

    // ========== Type Errors ==========
    #[error("invalid {kind} value for column type {column_type}")]
    ValueCoercion {
        kind: &'static str,
        column_type: ColumnType,
    },

    // ========== Schema Errors ==========
    #[error("table {0} already exists")]
    TableExists(String),

    #[error("table {0} does not exist")]
    TableNotFound(String),

    #[error("join table {0} does not exist")]
    JoinTableNotFound(String),

    #[error("column {0} not found")]
    ColumnNotFound(String),

    #[error("column {0} does not exist")]
    ColumnDoesNotExist(String),

    #[error("foreign key reference to unknown table '{table}' in column '{column}'")]
    UnknownReferenceTable { table: String, column: String },

    #[error("column count does not match value count")]
    ColumnCountMismatch,

    // ========== Constraint Errors ==========
    #[error("primary key column {0} not provided")]
    PrimaryKeyNotProvided(String),

    #[error("primary key value {0} already exists")]
    PrimaryKeyExists(String),

    #[error("unique constraint violation on column {0}")]
    UniqueViolation(String),

    // ========== Clause Errors ==========
    #[error("invalid set clause: {0}")]
    InvalidSetClause(String),

    #[error("invalid column type: {0}")]
    InvalidSetColumnType(String),

    #[error("invalid join syntax")]
    JoinSyntax,

    #[error("missing join table name")]
    MissingJoinTableName,

    #[error("invalid join condition")]
    JoinCondition,

    #[error("invalid left side of join condition")]
    JoinConditionLeft,

    #[error("invalid right side of join condition")]
    JoinConditionRight,

    #[error("invalid join clause: {0}")]
    InvalidJoinClause(String),

    #[error("invalid join condition: {0}")]
    InvalidJoinCondition(String),

    #[error("empty order by clause")]
    EmptyOrderByClause,

    #[error("invalid order by direction")]
    InvalidOrderByDirection,

    #[error("invalid limit clause: {0}")]
    InvalidLimitClause(String),

    // ========== Result Errors ==========
    #[error("no rows found")]
    NoRowsFound,

    #[error("no results found")]
    NoResultsFound,

    #[error("table {0} is empty")]
    TableEmpty(String),

    // ========== I/O Errors ==========
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Serialization(String),
}

/// Result type alias for GrainDB operations
pub type Result<T> = std::result::Result<T, Error>;
