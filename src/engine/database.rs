//! Database engine for GrainDB
//!
//! The `Database` owns the named-table catalog behind one reader/writer
//! lock and executes recognized statements against it. Mutating statements
//! hold the write lock across both the catalog mutation and the disk
//! snapshot, so a statement is durable exactly when its status string is
//! returned. `SELECT` holds the read lock and never snapshots.

use crate::catalog::{sort_rows, Column, Row, SortDirection, Table, Value};
use crate::engine::snapshot;
use crate::error::{Error, Result};
use crate::sql::{evaluate_where, recognize, Statement};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Extension of the snapshot file
const SNAPSHOT_EXTENSION: &str = "bin";

/// A named database: a catalog of tables with a durable snapshot file
#[derive(Debug)]
pub struct Database {
    name: String,
    path: PathBuf,
    tables: RwLock<HashMap<String, Table>>,
}

impl Database {
    /// Open a database, restoring the catalog from `<name>.bin` when the
    /// snapshot exists
    pub fn open(name: &str) -> Result<Database> {
        let path = PathBuf::from(format!("{}.{}", name, SNAPSHOT_EXTENSION));
        let tables = snapshot::load(&path)?.unwrap_or_default();
        Ok(Database {
            name: name.to_string(),
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Get the database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute one SQL statement, returning a status string for DDL/DML or
    /// a pretty-printed JSON array for SELECT
    pub fn execute(&self, sql: &str) -> Result<String> {
        match recognize(sql)? {
            Statement::CreateTable { table, column_defs } => {
                self.create_table(&table, &column_defs)
            }
            Statement::DropTable { table } => self.drop_table(&table),
            Statement::Insert {
                table,
                columns,
                values,
            } => self.insert(&table, &columns, &values),
            Statement::Update {
                table,
                set_clause,
                where_clause,
            } => self.update(&table, &set_clause, &where_clause),
            Statement::Delete {
                table,
                where_clause,
            } => self.delete(&table, where_clause.as_deref()),
            Statement::Select {
                table,
                projection,
                join_clause,
                where_clause,
                order_by_clause,
                limit_clause,
            } => self.select(
                &table,
                &projection,
                join_clause.as_deref(),
                where_clause.as_deref(),
                order_by_clause.as_deref(),
                limit_clause.as_deref(),
            ),
        }
    }

    /// Snapshot view of every table, for introspection
    pub fn all_tables(&self) -> HashMap<String, Table> {
        self.tables.read().unwrap().clone()
    }

    fn create_table(&self, name: &str, column_defs: &[String]) -> Result<String> {
        let mut tables = self.tables.write().unwrap();
        if tables.contains_key(name) {
            return Err(Error::TableExists(name.to_string()));
        }

        let mut table = Table::new(name);
        for definition in column_defs {
            let column = Column::parse_definition(definition.trim())?;
            if let Some(reference) = &column.reference {
                if !tables.contains_key(&reference.table) {
                    return Err(Error::UnknownReferenceTable {
                        table: reference.table.clone(),
                        column: column.name.clone(),
                    });
                }
            }
            table.add_column(column);
        }
        tables.insert(name.to_string(), table);

        snapshot::save(&self.path, &tables)?;
        Ok(format!("Table {} created", name))
    }

    fn drop_table(&self, name: &str) -> Result<String> {
        let mut tables = self.tables.write().unwrap();
        // Dropping an absent table is not an error
        tables.remove(name);

        snapshot::save(&self.path, &tables)?;
        Ok(format!("Table {} dropped", name))
    }

    fn insert(&self, name: &str, columns: &[String], values: &[String]) -> Result<String> {
        let mut tables = self.tables.write().unwrap();
        let table = tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        if columns.len() != values.len() {
            return Err(Error::ColumnCountMismatch);
        }

        let mut row = Row::new();
        for (column, literal) in columns.iter().zip(values) {
            let column = column.trim();
            let literal = literal.trim();
            // An unknown column stores the raw literal uncoerced
            let value = match table.column(column) {
                Some(declared) => Value::coerce(declared.column_type, literal)?,
                None => Value::Str(literal.to_string()),
            };
            row.insert(column.to_string(), value);
        }
        table.add_row(row)?;

        snapshot::save(&self.path, &tables)?;
        Ok("1 row inserted".to_string())
    }

    fn delete(&self, name: &str, where_clause: Option<&str>) -> Result<String> {
        let mut tables = self.tables.write().unwrap();
        let table = tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        if table.rows().is_empty() {
            return Err(Error::TableEmpty(name.to_string()));
        }

        // An empty WHERE keeps every row, and the reported count is the
        // number of rows kept, not removed. Inherited contract.
        let where_clause = where_clause.unwrap_or("");
        let kept: Vec<Row> = table
            .rows()
            .iter()
            .filter(|row| where_clause.is_empty() || !evaluate_where(row, where_clause))
            .cloned()
            .collect();
        let count = kept.len();
        *table.rows_mut() = kept;

        snapshot::save(&self.path, &tables)?;
        Ok(format!("{} rows deleted", count))
    }

    fn update(&self, name: &str, set_clause: &str, where_clause: &str) -> Result<String> {
        let mut tables = self.tables.write().unwrap();
        let table = tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        if table.rows().is_empty() {
            return Err(Error::TableEmpty(name.to_string()));
        }

        let matched: Vec<usize> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| evaluate_where(row, where_clause))
            .map(|(index, _)| index)
            .collect();
        if matched.is_empty() {
            return Err(Error::NoRowsFound);
        }

        // Coerce every assignment before touching any row, so a bad
        // assignment leaves no partial effect.
        let mut assignments = Vec::new();
        for part in set_clause.split(',') {
            let sides: Vec<&str> = part.split('=').collect();
            if sides.len() != 2 {
                return Err(Error::InvalidSetClause(part.to_string()));
            }
            let column = sides[0].trim();
            let literal = sides[1].trim();
            let column_type = table
                .column(column)
                .map(|declared| declared.column_type)
                .ok_or_else(|| Error::InvalidSetColumnType(String::new()))?;
            assignments.push((column.to_string(), Value::coerce(column_type, literal)?));
        }

        for (column, value) in &assignments {
            for &index in &matched {
                table.rows_mut()[index].insert(column.clone(), value.clone());
            }
        }

        snapshot::save(&self.path, &tables)?;
        Ok(format!("{} rows updated", matched.len()))
    }

    fn select(
        &self,
        name: &str,
        projection: &[String],
        join_clause: Option<&str>,
        where_clause: Option<&str>,
        order_by_clause: Option<&str>,
        limit_clause: Option<&str>,
    ) -> Result<String> {
        let tables = self.tables.read().unwrap();
        let main_table = tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        let where_clause = where_clause.unwrap_or("");
        let limit = match limit_clause {
            Some(clause) => parse_limit_clause(clause)?,
            None => 0,
        };

        let mut results: Vec<Row> = Vec::new();
        match join_clause {
            None => {
                for row in main_table.rows() {
                    if !evaluate_where(row, where_clause) {
                        continue;
                    }
                    let result_row = project_row(projection, row)?;
                    if limit > 0 && results.len() >= limit {
                        break;
                    }
                    results.push(result_row);
                }
            }
            Some(join_clause) => {
                let (join_table_name, condition) = parse_join_clause(join_clause)
                    .map_err(|e| Error::InvalidJoinClause(e.to_string()))?;
                let join_table = tables
                    .get(&join_table_name)
                    .ok_or_else(|| Error::JoinTableNotFound(join_table_name.clone()))?;
                let (left_column, right_column) = parse_join_condition(&condition)
                    .map_err(|e| Error::InvalidJoinCondition(e.to_string()))?;

                'outer: for main_row in main_table.rows() {
                    for join_row in join_table.rows() {
                        if main_row.get(&left_column) != join_row.get(&right_column) {
                            continue;
                        }
                        // Combined row: join-table fields win on collision
                        let mut combined = main_row.clone();
                        combined.extend(join_row.clone());
                        if !evaluate_where(&combined, where_clause) {
                            continue;
                        }
                        let result_row = project_joined_row(
                            projection,
                            &combined,
                            name,
                            main_row,
                            &join_table_name,
                            join_row,
                        )?;
                        if limit > 0 && results.len() >= limit {
                            break 'outer;
                        }
                        results.push(result_row);
                    }
                }
            }
        }

        if results.is_empty() {
            return Err(Error::NoResultsFound);
        }

        if let Some(order_by_clause) = order_by_clause {
            let (order_column, direction) = parse_order_by_clause(order_by_clause)?;
            // The sort column resolves against the main table, not the
            // projected result
            let column = main_table
                .column(&order_column)
                .ok_or_else(|| Error::ColumnDoesNotExist(order_column.clone()))?;
            results = sort_rows(results, column, direction);
        }

        let json_rows: Vec<serde_json::Value> = results.iter().map(row_to_json).collect();
        serde_json::to_string_pretty(&json_rows).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Project a source row into a result row (no JOIN)
fn project_row(projection: &[String], row: &Row) -> Result<Row> {
    let mut result_row = Row::new();
    for column in projection {
        let column = column.trim();
        if column == "*" {
            result_row.extend(row.clone());
        } else if let Some(value) = row.get(column) {
            result_row.insert(column.to_string(), value.clone());
        } else {
            return Err(Error::ColumnNotFound(column.to_string()));
        }
    }
    Ok(result_row)
}

/// Project a combined row, resolving `table.column` names from the
/// originating row and keeping the qualified key in the output
fn project_joined_row(
    projection: &[String],
    combined: &Row,
    main_table: &str,
    main_row: &Row,
    join_table: &str,
    join_row: &Row,
) -> Result<Row> {
    let mut result_row = Row::new();
    for column in projection {
        let column = column.trim();
        if column == "*" {
            result_row.extend(combined.clone());
            continue;
        }
        if let Some(value) = combined.get(column) {
            result_row.insert(column.to_string(), value.clone());
            continue;
        }
        let resolved = column.split_once('.').and_then(|(prefix, unqualified)| {
            if prefix == main_table {
                main_row.get(unqualified)
            } else if prefix == join_table {
                join_row.get(unqualified)
            } else {
                None
            }
        });
        match resolved {
            Some(value) => {
                result_row.insert(column.to_string(), value.clone());
            }
            None => return Err(Error::ColumnNotFound(column.to_string())),
        }
    }
    Ok(result_row)
}

/// Parse `JOIN <table> ON <condition>` into the table name and condition
fn parse_join_clause(join_clause: &str) -> Result<(String, String)> {
    let (join_part, condition) = join_clause.split_once("ON").ok_or(Error::JoinSyntax)?;
    let join_part = join_part.trim();
    let join_table = join_part.strip_prefix("JOIN").unwrap_or(join_part).trim();
    if join_table.is_empty() {
        return Err(Error::MissingJoinTableName);
    }
    Ok((join_table.to_string(), condition.trim().to_string()))
}

/// Parse `t1.col = t2.col` into the two column names
fn parse_join_condition(condition: &str) -> Result<(String, String)> {
    let sides: Vec<&str> = condition.split('=').collect();
    if sides.len() != 2 {
        return Err(Error::JoinCondition);
    }

    let left: Vec<&str> = sides[0].trim().split('.').collect();
    if left.len() != 2 {
        return Err(Error::JoinConditionLeft);
    }
    let right: Vec<&str> = sides[1].trim().split('.').collect();
    if right.len() != 2 {
        return Err(Error::JoinConditionRight);
    }

    Ok((left[1].to_string(), right[1].to_string()))
}

/// Parse `ORDER BY <column> [ASC|DESC]`
fn parse_order_by_clause(order_by_clause: &str) -> Result<(String, SortDirection)> {
    let parts: Vec<&str> = order_by_clause.trim().split_whitespace().collect();
    let column = match parts.first() {
        Some(column) => *column,
        None => return Err(Error::EmptyOrderByClause),
    };
    let direction = match parts.get(1) {
        None => SortDirection::Ascending,
        Some(direction) => match direction.to_uppercase().as_str() {
            "ASC" => SortDirection::Ascending,
            "DESC" => SortDirection::Descending,
            _ => return Err(Error::InvalidOrderByDirection),
        },
    };
    Ok((column.to_string(), direction))
}

fn parse_limit_clause(limit_clause: &str) -> Result<usize> {
    limit_clause
        .parse::<usize>()
        .map_err(|e| Error::InvalidLimitClause(e.to_string()))
}

fn row_to_json(row: &Row) -> serde_json::Value {
    serde_json::Value::Object(
        row.iter()
            .map(|(column, value)| (column.clone(), value.to_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db(name: &str) -> (tempfile::TempDir, Database) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(temp_dir.path().join(name).to_str().unwrap()).unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_status_strings() {
        let (_dir, db) = open_db("statusdb");
        assert_eq!(
            db.execute("CREATE TABLE users (id INT, name VARCHAR)").unwrap(),
            "Table users created"
        );
        assert_eq!(
            db.execute("INSERT INTO users (id, name) VALUES (1, 'Alice')").unwrap(),
            "1 row inserted"
        );
        assert_eq!(
            db.execute("UPDATE users SET name = 'Bob' WHERE id = 1").unwrap(),
            "1 rows updated"
        );
        assert_eq!(db.execute("DELETE FROM users WHERE id = 1").unwrap(), "0 rows deleted");
        assert_eq!(db.execute("DROP TABLE users").unwrap(), "Table users dropped");
    }

    #[test]
    fn test_create_duplicate_table() {
        let (_dir, db) = open_db("dupdb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        let err = db.execute("CREATE TABLE t (id INT)").unwrap_err();
        assert_eq!(err.to_string(), "table t already exists");
    }

    #[test]
    fn test_drop_missing_table_succeeds() {
        let (_dir, db) = open_db("dropdb");
        assert_eq!(db.execute("DROP TABLE ghost").unwrap(), "Table ghost dropped");
    }

    #[test]
    fn test_foreign_key_requires_existing_table() {
        let (_dir, db) = open_db("fkdb");
        let err = db
            .execute("CREATE TABLE posts (user_id INT FOREIGN KEY REFERENCES users(id))")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "foreign key reference to unknown table 'users' in column 'user_id'"
        );
        // The reference column itself is not verified
        db.execute("CREATE TABLE users (id INT)").unwrap();
        db.execute("CREATE TABLE posts (user_id INT FOREIGN KEY REFERENCES users(nope))")
            .unwrap();
    }

    #[test]
    fn test_insert_column_count_mismatch() {
        let (_dir, db) = open_db("mismatchdb");
        db.execute("CREATE TABLE t (id INT, name VARCHAR)").unwrap();
        let err = db.execute("INSERT INTO t (id) VALUES (1, 'x')").unwrap_err();
        assert_eq!(err.to_string(), "column count does not match value count");
    }

    #[test]
    fn test_insert_unknown_column_stores_raw_literal() {
        let (_dir, db) = open_db("rawdb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        db.execute("INSERT INTO t (id, mystery) VALUES (1, 'x')").unwrap();

        let tables = db.all_tables();
        assert_eq!(
            tables["t"].rows()[0]["mystery"],
            Value::Str("'x'".to_string())
        );
    }

    #[test]
    fn test_delete_without_where_keeps_rows() {
        let (_dir, db) = open_db("deldb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        db.execute("INSERT INTO t (id) VALUES (1)").unwrap();
        db.execute("INSERT INTO t (id) VALUES (2)").unwrap();

        // Inherited behavior: the empty predicate keeps every row
        assert_eq!(db.execute("DELETE FROM t").unwrap(), "2 rows deleted");
        assert_eq!(db.all_tables()["t"].rows().len(), 2);
    }

    #[test]
    fn test_update_no_matching_rows() {
        let (_dir, db) = open_db("updb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        db.execute("INSERT INTO t (id) VALUES (1)").unwrap();
        let err = db.execute("UPDATE t SET id = 2 WHERE id = 99").unwrap_err();
        assert_eq!(err.to_string(), "no rows found");
    }

    #[test]
    fn test_update_bad_assignment_leaves_rows_untouched() {
        let (_dir, db) = open_db("atomicdb");
        db.execute("CREATE TABLE t (id INT, age INT)").unwrap();
        db.execute("INSERT INTO t (id, age) VALUES (1, 20)").unwrap();

        let err = db
            .execute("UPDATE t SET id = 5, age = banana WHERE id = 1")
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid integer value for column type INT");
        assert_eq!(db.all_tables()["t"].rows()[0]["id"], Value::Int(1));
    }

    #[test]
    fn test_select_empty_result_is_an_error() {
        let (_dir, db) = open_db("emptydb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        db.execute("INSERT INTO t (id) VALUES (1)").unwrap();
        let err = db.execute("SELECT * FROM t WHERE id = 99").unwrap_err();
        assert_eq!(err.to_string(), "no results found");
    }

    #[test]
    fn test_limit_truncates_before_order_by() {
        let (_dir, db) = open_db("limitdb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        for id in [3, 1, 2] {
            db.execute(&format!("INSERT INTO t (id) VALUES ({})", id)).unwrap();
        }

        // LIMIT 2 takes the first two accepted rows (3, 1) and ORDER BY
        // only sorts that prefix. Inherited behavior.
        let result = db.execute("SELECT * FROM t ORDER BY id LIMIT 2").unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&result).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_order_by_unknown_column() {
        let (_dir, db) = open_db("orderdb");
        db.execute("CREATE TABLE t (id INT)").unwrap();
        db.execute("INSERT INTO t (id) VALUES (1)").unwrap();
        let err = db.execute("SELECT * FROM t ORDER BY ghost").unwrap_err();
        assert_eq!(err.to_string(), "column ghost does not exist");
    }

    #[test]
    fn test_join_clause_parsing_errors() {
        assert_eq!(
            parse_join_clause("JOIN users posts.id = users.id")
                .unwrap_err()
                .to_string(),
            "invalid join syntax"
        );
        assert_eq!(
            parse_join_condition("posts.user_id == users.id")
                .unwrap_err()
                .to_string(),
            "invalid join condition"
        );
        assert_eq!(
            parse_join_condition("user_id = users.id")
                .unwrap_err()
                .to_string(),
            "invalid left side of join condition"
        );
    }

    #[test]
    fn test_order_by_direction_parsing() {
        assert_eq!(
            parse_order_by_clause("name").unwrap(),
            ("name".to_string(), SortDirection::Ascending)
        );
        assert_eq!(
            parse_order_by_clause("name desc").unwrap(),
            ("name".to_string(), SortDirection::Descending)
        );
        assert_eq!(
            parse_order_by_clause("name sideways").unwrap_err().to_string(),
            "invalid order by direction"
        );
    }
}
