//! WHERE clause evaluation for GrainDB
//!
//! A predicate is a single `column OP literal` expression. The clause is
//! split on the first operator found by fixed list order (multi-character
//! operators are listed before their single-character prefixes, so `<=`
//! never splits as `<`).

use crate::catalog::value::strip_quotes;
use crate::catalog::{Row, Value};
use std::cmp::Ordering;

const OPERATORS: [&str; 7] = ["<=", ">=", "!=", "=", "<", ">", "LIKE"];

/// Evaluate a WHERE clause against a row
///
/// An empty clause is true. A malformed clause (no operator) or a missing
/// column is false.
pub fn evaluate_where(row: &Row, clause: &str) -> bool {
    if clause.is_empty() {
        return true;
    }

    let Some((op, lhs, rhs)) = split_clause(clause) else {
        return false;
    };
    let column = lhs.trim();
    let literal = strip_quotes(rhs.trim());

    let Some(value) = row.get(column) else {
        return false;
    };

    match op {
        "=" => compare(value, literal) == Ordering::Equal,
        "!=" => compare(value, literal) != Ordering::Equal,
        "<" => compare(value, literal) == Ordering::Less,
        ">" => compare(value, literal) == Ordering::Greater,
        "<=" => compare(value, literal) != Ordering::Greater,
        ">=" => compare(value, literal) != Ordering::Less,
        "LIKE" => value.to_string().contains(literal),
        _ => false,
    }
}

fn split_clause(clause: &str) -> Option<(&'static str, &str, &str)> {
    for op in OPERATORS {
        if let Some((lhs, rhs)) = clause.split_once(op) {
            return Some((op, lhs, rhs));
        }
    }
    None
}

/// Compare a row value against a literal: numeric when both sides are
/// numeric, byte-lexicographic on the display form otherwise
fn compare(value: &Value, literal: &str) -> Ordering {
    if let (Some(lhs), Ok(rhs)) = (value.as_f64(), literal.parse::<f64>()) {
        return lhs.partial_cmp(&rhs).unwrap_or(Ordering::Greater);
    }
    value.to_string().as_str().cmp(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        [
            ("id".to_string(), Value::Int(2)),
            ("age".to_string(), Value::Int(30)),
            ("score".to_string(), Value::Float(7.5)),
            ("name".to_string(), Value::Str("Alice".to_string())),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_clause_is_true() {
        assert!(evaluate_where(&row(), ""));
    }

    #[test]
    fn test_numeric_operators() {
        let row = row();
        assert!(evaluate_where(&row, "age = 30"));
        assert!(evaluate_where(&row, "age != 29"));
        assert!(evaluate_where(&row, "age < 31"));
        assert!(evaluate_where(&row, "age > 29"));
        assert!(evaluate_where(&row, "age <= 30"));
        assert!(evaluate_where(&row, "age >= 30"));
        assert!(!evaluate_where(&row, "age < 30"));
    }

    #[test]
    fn test_float_against_integer_literal() {
        let row = row();
        assert!(evaluate_where(&row, "score > 7"));
        assert!(evaluate_where(&row, "score = 7.5"));
    }

    #[test]
    fn test_string_comparison() {
        let row = row();
        assert!(evaluate_where(&row, "name = 'Alice'"));
        assert!(evaluate_where(&row, "name < 'Bob'"));
        assert!(evaluate_where(&row, "name > 'Aaron'"));
    }

    #[test]
    fn test_like_is_substring() {
        let row = row();
        assert!(evaluate_where(&row, "name LIKE 'li'"));
        assert!(evaluate_where(&row, "name LIKE 'Alice'"));
        assert!(!evaluate_where(&row, "name LIKE 'bob'"));
    }

    #[test]
    fn test_missing_column_is_false() {
        assert!(!evaluate_where(&row(), "email = 'x'"));
    }

    #[test]
    fn test_malformed_clause_is_false() {
        assert!(!evaluate_where(&row(), "age 30"));
    }

    #[test]
    fn test_multi_char_operators_win_over_prefixes() {
        let row = row();
        // "<=" must not split as "<" followed by "= 30"
        assert!(evaluate_where(&row, "age <= 30"));
        assert!(evaluate_where(&row, "age >= 30"));
        assert!(evaluate_where(&row, "age != 31"));
    }
}
