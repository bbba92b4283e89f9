//! GrainDB - a simple file-backed SQL database engine written in Rust
//!
//! This library provides the core components for a small SQL data store:
//! - Statement recognition and WHERE evaluation
//! - Typed values, columns, and tables with constraint enforcement
//! - A statement executor over a concurrent named-table catalog
//! - Whole-catalog binary snapshots for durability

pub mod catalog;
pub mod engine;
pub mod error;
pub mod sql;

pub use engine::Database;
pub use error::{Error, Result};
