//! Table storage for GrainDB
//!
//! This module combines the column schema with the row store and enforces
//! the per-table constraints (primary key, unique, auto-increment) on
//! insert. Rows live in insertion order; that order is observable through
//! `SELECT *` without an `ORDER BY`.

use crate::catalog::column::{Column, ColumnConstraint};
use crate::catalog::value::{Value, DATE_FORMAT};
use crate::catalog::ColumnType;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// A row: column name mapped to a typed value
///
/// A `BTreeMap` keeps JSON object keys in a deterministic (sorted) order.
pub type Row = BTreeMap<String, Value>;

/// Sort direction for `ORDER BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A database table: ordered columns plus insertion-ordered rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    /// Name of the primary key column, if one was declared
    primary_key: Option<String>,
    /// Column name -> `referenced_table.referenced_column`
    foreign_keys: HashMap<String, String>,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            primary_key: None,
            foreign_keys: HashMap::new(),
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a column, recording primary key and foreign key bookkeeping
    pub fn add_column(&mut self, column: Column) {
        if column.has_constraint(ColumnConstraint::PrimaryKey) {
            self.primary_key = Some(column.name.clone());
        }
        if let Some(reference) = &column.reference {
            self.foreign_keys.insert(
                column.name.clone(),
                format!("{}.{}", reference.table, reference.column),
            );
        }
        self.columns.push(column);
    }

    /// Append a row after enforcing the table's constraints
    ///
    /// Enforcement order: auto-increment fill first (so an auto-increment
    /// primary key is populated before the presence check), then primary
    /// key presence, primary key uniqueness, unique columns, append.
    pub fn add_row(&mut self, mut row: Row) -> Result<()> {
        for column in &self.columns {
            if column.has_constraint(ColumnConstraint::AutoIncrement)
                && !row.contains_key(&column.name)
            {
                let next = self
                    .rows
                    .iter()
                    .filter_map(|existing| match existing.get(&column.name) {
                        Some(Value::Int(i)) => Some(*i),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0)
                    + 1;
                row.insert(column.name.clone(), Value::Int(next));
            }
        }

        if let Some(key) = &self.primary_key {
            let value = row
                .get(key)
                .ok_or_else(|| Error::PrimaryKeyNotProvided(key.clone()))?;
            if self.rows.iter().any(|existing| existing.get(key) == Some(value)) {
                return Err(Error::PrimaryKeyExists(value.to_string()));
            }
        }

        for column in &self.columns {
            if !column.has_constraint(ColumnConstraint::Unique) {
                continue;
            }
            if let Some(value) = row.get(&column.name) {
                if self
                    .rows
                    .iter()
                    .any(|existing| existing.get(&column.name) == Some(value))
                {
                    return Err(Error::UniqueViolation(column.name.clone()));
                }
            }
        }

        self.rows.push(row);
        Ok(())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Check if a column exists
    pub fn column_exists(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Get all columns in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get all rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to the row store, for the executor
    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    /// Name of the primary key column, if any
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Foreign key map: column name -> `table.column`
    pub fn foreign_keys(&self) -> &HashMap<String, String> {
        &self.foreign_keys
    }
}

/// Stable sort of a row set by one column, using the type-specific
/// comparator for the column's declared type
///
/// Rows whose value is missing or of the wrong variant are incomparable;
/// the stable sort leaves them in their current relative position.
pub fn sort_rows(mut rows: Vec<Row>, column: &Column, direction: SortDirection) -> Vec<Row> {
    rows.sort_by(|a, b| {
        let ordering = compare_by_column(a, b, column).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    rows
}

fn compare_by_column(a: &Row, b: &Row, column: &Column) -> Option<Ordering> {
    let left = a.get(&column.name)?;
    let right = b.get(&column.name)?;
    match column.column_type {
        ColumnType::Int => match (left, right) {
            (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
            _ => None,
        },
        ColumnType::Double | ColumnType::Float => match (left, right) {
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            _ => None,
        },
        ColumnType::Varchar => match (left, right) {
            (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
            _ => None,
        },
        ColumnType::Bool => match (left, right) {
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        },
        ColumnType::Date => match (left, right) {
            (Value::Date(x), Value::Date(y)) => {
                let x = NaiveDate::parse_from_str(x, DATE_FORMAT).ok()?;
                let y = NaiveDate::parse_from_str(y, DATE_FORMAT).ok()?;
                Some(x.cmp(&y))
            }
            _ => None,
        },
        ColumnType::Enum => match (left, right) {
            (Value::Str(x), Value::Str(y)) => {
                Some(x.to_lowercase().cmp(&y.to_lowercase()))
            }
            _ => None,
        },
    }
}
