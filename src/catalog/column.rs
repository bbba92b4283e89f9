//! Column definitions for GrainDB
//!
//! This module defines the SQL column types, column constraints, and the
//! parser for `CREATE TABLE` column definition fragments.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integer
    Int,
    /// Double-precision floating point
    Double,
    /// Single-precision floating point (stored as f64 at rest)
    Float,
    /// Variable-length character string
    Varchar,
    /// Boolean
    Bool,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Enumeration, stored as its literal text
    Enum,
}

impl ColumnType {
    /// Parse a DDL type keyword (case-insensitive)
    pub fn parse(keyword: &str) -> Option<ColumnType> {
        match keyword.to_uppercase().as_str() {
            "INT" => Some(ColumnType::Int),
            "DOUBLE" => Some(ColumnType::Double),
            "FLOAT" => Some(ColumnType::Float),
            "VARCHAR" => Some(ColumnType::Varchar),
            "BOOL" => Some(ColumnType::Bool),
            "DATE" => Some(ColumnType::Date),
            "ENUM" => Some(ColumnType::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Double => write!(f, "DOUBLE"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Varchar => write!(f, "VARCHAR"),
            ColumnType::Bool => write!(f, "BOOL"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::Enum => write!(f, "ENUM"),
        }
    }
}

/// SQL column constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnConstraint {
    /// Explicitly nullable
    Null,
    /// NOT NULL
    NotNull,
    /// UNIQUE
    Unique,
    /// PRIMARY KEY
    PrimaryKey,
    /// FOREIGN KEY (the reference lives on the column)
    ForeignKey,
    /// AUTO_INCREMENT
    AutoIncrement,
}

impl ColumnConstraint {
    /// Parse a single-token constraint keyword (already upper-cased)
    ///
    /// Multi-token constraints (`NOT NULL`, `PRIMARY KEY`, `FOREIGN KEY
    /// REFERENCES ...`) are folded by [`Column::parse_definition`].
    fn parse_keyword(keyword: &str) -> Option<ColumnConstraint> {
        match keyword {
            "NULL" => Some(ColumnConstraint::Null),
            "UNIQUE" => Some(ColumnConstraint::Unique),
            "AUTO_INCREMENT" => Some(ColumnConstraint::AutoIncrement),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnConstraint::Null => write!(f, "NULL"),
            ColumnConstraint::NotNull => write!(f, "NOT NULL"),
            ColumnConstraint::Unique => write!(f, "UNIQUE"),
            ColumnConstraint::PrimaryKey => write!(f, "PRIMARY KEY"),
            ColumnConstraint::ForeignKey => write!(f, "FOREIGN KEY"),
            ColumnConstraint::AutoIncrement => write!(f, "AUTO_INCREMENT"),
        }
    }
}

/// A foreign key target: `table(column)` in DDL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    /// Referenced table name
    pub table: String,
    /// Referenced column name
    pub column: String,
}

/// Column definition in a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub column_type: ColumnType,
    /// Constraints, in the order they were written
    pub constraints: Vec<ColumnConstraint>,
    /// Foreign key target, when the column carries a FOREIGN KEY constraint
    pub reference: Option<ForeignKeyReference>,
}

impl Column {
    /// Parse a single column definition fragment from a `CREATE TABLE`
    /// statement, e.g. `id INT PRIMARY KEY AUTO_INCREMENT` or
    /// `user_id INT FOREIGN KEY REFERENCES users(id)`.
    ///
    /// Tokenization is plain whitespace splitting: the first token is the
    /// name, the second the type, and the rest are folded into constraints.
    pub fn parse_definition(definition: &str) -> Result<Column> {
        let tokens: Vec<&str> = definition.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(Error::InvalidColumnDefinition);
        }

        let column_type = ColumnType::parse(tokens[1]).ok_or(Error::InvalidColumnType)?;

        let mut constraints = Vec::new();
        let mut reference = None;
        let mut i = 2;
        while i < tokens.len() {
            let keyword = tokens[i].to_uppercase();
            match keyword.as_str() {
                "NOT" if i + 1 < tokens.len() && tokens[i + 1].eq_ignore_ascii_case("NULL") => {
                    constraints.push(ColumnConstraint::NotNull);
                    i += 2;
                }
                "PRIMARY" if i + 1 < tokens.len() && tokens[i + 1].eq_ignore_ascii_case("KEY") => {
                    constraints.push(ColumnConstraint::PrimaryKey);
                    i += 2;
                }
                "FOREIGN"
                    if i + 3 < tokens.len()
                        && tokens[i + 1].eq_ignore_ascii_case("KEY")
                        && tokens[i + 2].eq_ignore_ascii_case("REFERENCES") =>
                {
                    constraints.push(ColumnConstraint::ForeignKey);
                    reference = Some(parse_reference(tokens[i + 3])?);
                    i += 4;
                }
                _ => {
                    let constraint = ColumnConstraint::parse_keyword(&keyword)
                        .ok_or_else(|| Error::InvalidConstraint(keyword.clone()))?;
                    constraints.push(constraint);
                    i += 1;
                }
            }
        }

        Ok(Column {
            name: tokens[0].to_string(),
            column_type,
            constraints,
            reference,
        })
    }

    /// Check whether this column carries the given constraint
    pub fn has_constraint(&self, constraint: ColumnConstraint) -> bool {
        self.constraints.contains(&constraint)
    }
}

/// Parse a `table(column)` reference token
fn parse_reference(token: &str) -> Result<ForeignKeyReference> {
    let open = token.find('(');
    let close = token.find(')');
    match (open, close) {
        (Some(open), Some(close)) if close > open + 1 => Ok(ForeignKeyReference {
            table: token[..open].to_string(),
            column: token[open + 1..close].to_string(),
        }),
        _ => Err(Error::InvalidForeignKeyReference),
    }
}
