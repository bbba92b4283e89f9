//! SQL surface module
//!
//! This module contains the shape-based statement recognizer and the WHERE
//! clause evaluator.

pub mod predicate;
pub mod statement;

pub use predicate::evaluate_where;
pub use statement::{recognize, Statement};
