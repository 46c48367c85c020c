//! SQLite-specific compilation hooks.

use crate::grammar::{Compiled, Grammar, UpsertUpdate};
use crate::json;
use crate::postgres;
use quarry_core::{Result, Value};
use quarry_query::{DatePart, QueryModel};

/// Operators SQLite accepts beyond the shared base set.
pub(crate) const OPERATOR_EXTRAS: &[&str] = &["ilike", "glob", "match", "regexp"];

/// `json_array_length(col[, '$."path"']) <op> <value>`
pub(crate) fn json_length_sql(column: &str, path: &[String], operator: &str, value: &str) -> String {
    if path.is_empty() {
        format!("json_array_length({column}) {operator} {value}")
    } else {
        format!(
            "json_array_length({column}, {}) {operator} {value}",
            json::path_literal(path)
        )
    }
}

/// Date-part extraction via `strftime`.
///
/// `strftime` returns text, so the bound value is cast to text to keep the
/// comparison well-typed.
pub(crate) fn date_based_sql(part: DatePart, column: &str, operator: &str, value: &str) -> String {
    let format = match part {
        DatePart::Date => "%Y-%m-%d",
        DatePart::Day => "%d",
        DatePart::Month => "%m",
        DatePart::Year => "%Y",
        DatePart::Time => "%H:%M:%S",
    };
    format!("strftime('{format}', {column}) {operator} cast({value} as text)")
}

/// SQLite follows the PostgreSQL `on conflict ... do update set` form.
pub(crate) fn upsert_suffix(
    grammar: &Grammar,
    query: &QueryModel,
    unique_by: &[String],
    update: &UpsertUpdate,
    bindings: &mut Vec<Value>,
) -> Result<String> {
    postgres::upsert_suffix(grammar, query, unique_by, update, bindings)
}

/// SQLite has no `truncate`: reset the auto-increment bookkeeping row, then
/// delete the table's rows. Two statements, executed in order.
pub(crate) fn truncate(grammar: &Grammar, query: &QueryModel) -> Result<Vec<Compiled>> {
    let table = grammar.statement_table(query, "truncate")?;
    Ok(vec![
        Compiled {
            sql: "delete from sqlite_sequence where name = ?".to_string(),
            bindings: vec![Value::Text(grammar.prefixed_table_name(table))],
        },
        Compiled {
            sql: format!("delete from {}", grammar.wrap_table(query, table)),
            bindings: Vec::new(),
        },
    ])
}
