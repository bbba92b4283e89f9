//! Statement recognition for GrainDB
//!
//! The recognizer is shape-based: six anchored, case-insensitive patterns
//! are tried in order of specificity and the first match wins. It extracts
//! clause substrings only; every semantic check happens in the executor.
//!
//! Comma-separated lists (column definitions, insert columns/values,
//! projections) are split with no quote awareness, so a comma inside a
//! string literal is mis-tokenized. Known limitation, kept for
//! compatibility with existing callers.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// A recognized SQL statement with its raw clause fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable {
        table: String,
        column_defs: Vec<String>,
    },
    DropTable {
        table: String,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    },
    Update {
        table: String,
        set_clause: String,
        where_clause: String,
    },
    Delete {
        table: String,
        where_clause: Option<String>,
    },
    Select {
        table: String,
        projection: Vec<String>,
        join_clause: Option<String>,
        where_clause: Option<String>,
        order_by_clause: Option<String>,
        limit_clause: Option<String>,
    },
}

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CREATE\s+TABLE\s+(\w+)\s*\((.+)\)\s*$").unwrap());
static DROP_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^DROP\s+TABLE\s+(\w+)\s*$").unwrap());
static DELETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^DELETE\s+FROM\s+(\w+)(?:\s+WHERE\s+(.+?))?\s*$").unwrap());
static INSERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^INSERT\s+INTO\s+(\w+)\s*(?:\((.+?)\))?\s*VALUES\s*\((.+?)\)\s*$").unwrap()
});
static UPDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^UPDATE\s+(\w+)\s+SET\s+(.+?)\s+WHERE\s+(.+?)\s*$").unwrap());
static SELECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^SELECT\s+(.+?)\s+FROM\s+(\w+)(?:\s+(JOIN\s+.+?\s+ON\s+.+?))?(?:\s+WHERE\s+(.+?))?(?:\s+ORDER BY\s+(.+?))?(?:\s+LIMIT\s+(\d+))?\s*$",
    )
    .unwrap()
});

/// Recognize a SQL statement
pub fn recognize(sql: &str) -> Result<Statement> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(Error::EmptyStatement);
    }

    if let Some(caps) = CREATE_TABLE.captures(sql) {
        return Ok(Statement::CreateTable {
            table: caps[1].to_string(),
            column_defs: split_list(&caps[2]),
        });
    }

    if let Some(caps) = DROP_TABLE.captures(sql) {
        return Ok(Statement::DropTable {
            table: caps[1].to_string(),
        });
    }

    if let Some(caps) = DELETE.captures(sql) {
        return Ok(Statement::Delete {
            table: caps[1].to_string(),
            where_clause: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    if let Some(caps) = INSERT.captures(sql) {
        return Ok(Statement::Insert {
            table: caps[1].to_string(),
            columns: caps
                .get(2)
                .map(|m| split_list(m.as_str()))
                .unwrap_or_default(),
            values: split_list(&caps[3]),
        });
    }

    if let Some(caps) = UPDATE.captures(sql) {
        return Ok(Statement::Update {
            table: caps[1].to_string(),
            set_clause: caps[2].to_string(),
            where_clause: caps[3].to_string(),
        });
    }

    if let Some(caps) = SELECT.captures(sql) {
        return Ok(Statement::Select {
            projection: split_list(&caps[1]),
            table: caps[2].to_string(),
            join_clause: caps.get(3).map(|m| m.as_str().to_string()),
            where_clause: caps.get(4).map(|m| m.as_str().to_string()),
            order_by_clause: caps.get(5).map(|m| m.as_str().to_string()),
            limit_clause: caps.get(6).map(|m| m.as_str().to_string()),
        });
    }

    Err(Error::UnsupportedCommand)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_create_table() {
        let stmt = recognize("CREATE TABLE users (id INT, name VARCHAR)").unwrap();
        assert_eq!(
            stmt,
            Statement::CreateTable {
                table: "users".to_string(),
                column_defs: vec!["id INT".to_string(), " name VARCHAR".to_string()],
            }
        );
    }

    #[test]
    fn test_recognize_drop_table() {
        let stmt = recognize("drop table users").unwrap();
        assert_eq!(
            stmt,
            Statement::DropTable {
                table: "users".to_string(),
            }
        );
    }

    #[test]
    fn test_recognize_insert() {
        let stmt = recognize("INSERT INTO users (id, name) VALUES (1, 'Alice')").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert {
                table: "users".to_string(),
                columns: vec!["id".to_string(), " name".to_string()],
                values: vec!["1".to_string(), " 'Alice'".to_string()],
            }
        );
    }

    #[test]
    fn test_recognize_insert_without_columns() {
        let stmt = recognize("INSERT INTO users VALUES (1, 'Alice')").unwrap();
        match stmt {
            Statement::Insert { columns, values, .. } => {
                assert!(columns.is_empty());
                assert_eq!(values.len(), 2);
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_recognize_update() {
        let stmt = recognize("UPDATE users SET name = 'Bob' WHERE id = 1").unwrap();
        assert_eq!(
            stmt,
            Statement::Update {
                table: "users".to_string(),
                set_clause: "name = 'Bob'".to_string(),
                where_clause: "id = 1".to_string(),
            }
        );
    }

    #[test]
    fn test_recognize_delete_with_and_without_where() {
        let stmt = recognize("DELETE FROM users WHERE id = 1").unwrap();
        assert_eq!(
            stmt,
            Statement::Delete {
                table: "users".to_string(),
                where_clause: Some("id = 1".to_string()),
            }
        );

        let stmt = recognize("DELETE FROM users").unwrap();
        assert_eq!(
            stmt,
            Statement::Delete {
                table: "users".to_string(),
                where_clause: None,
            }
        );
    }

    #[test]
    fn test_recognize_select_all_clauses() {
        let stmt = recognize(
            "SELECT posts.title, users.name FROM posts JOIN users ON posts.user_id = users.id \
             WHERE id > 1 ORDER BY id DESC LIMIT 10",
        )
        .unwrap();
        assert_eq!(
            stmt,
            Statement::Select {
                table: "posts".to_string(),
                projection: vec!["posts.title".to_string(), " users.name".to_string()],
                join_clause: Some("JOIN users ON posts.user_id = users.id".to_string()),
                where_clause: Some("id > 1".to_string()),
                order_by_clause: Some("id DESC".to_string()),
                limit_clause: Some("10".to_string()),
            }
        );
    }

    #[test]
    fn test_recognize_plain_select() {
        let stmt = recognize("SELECT * FROM users").unwrap();
        assert_eq!(
            stmt,
            Statement::Select {
                table: "users".to_string(),
                projection: vec!["*".to_string()],
                join_clause: None,
                where_clause: None,
                order_by_clause: None,
                limit_clause: None,
            }
        );
    }

    #[test]
    fn test_recognize_empty_statement() {
        let err = recognize("   ").unwrap_err();
        assert_eq!(err.to_string(), "empty SQL statement");
    }

    #[test]
    fn test_recognize_unsupported_command() {
        let err = recognize("TRUNCATE TABLE users").unwrap_err();
        assert_eq!(err.to_string(), "unsupported SQL command");
    }
}
