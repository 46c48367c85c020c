//! MySQL-specific compilation hooks.

use crate::grammar::{Compiled, Grammar, UpsertUpdate};
use crate::json;
use quarry_core::{Result, Value};
use quarry_query::{DatePart, QueryModel};

/// Operators MySQL accepts beyond the shared base set.
pub(crate) const OPERATOR_EXTRAS: &[&str] = &[
    "<=>",
    "sounds like",
    "regexp",
    "not regexp",
    "rlike",
    "not rlike",
];

/// `[not ]json_contains(col, ?[, '$."path"'])`
pub(crate) fn json_contains_sql(column: &str, path: &[String], negated: bool) -> String {
    let not = if negated { "not " } else { "" };
    if path.is_empty() {
        format!("{not}json_contains({column}, ?)")
    } else {
        format!("{not}json_contains({column}, ?, {})", json::path_literal(path))
    }
}

/// `json_length(col[, '$."path"']) <op> <value>`
pub(crate) fn json_length_sql(column: &str, path: &[String], operator: &str, value: &str) -> String {
    if path.is_empty() {
        format!("json_length({column}) {operator} {value}")
    } else {
        format!(
            "json_length({column}, {}) {operator} {value}",
            json::path_literal(path)
        )
    }
}

/// Date-part extraction via MySQL's date functions.
pub(crate) fn date_based_sql(part: DatePart, column: &str, operator: &str, value: &str) -> String {
    let function = match part {
        DatePart::Date => "date",
        DatePart::Day => "day",
        DatePart::Month => "month",
        DatePart::Year => "year",
        DatePart::Time => "time",
    };
    format!("{function}({column}) {operator} {value}")
}

/// ` on duplicate key update a = values(a), b = ?`
///
/// MySQL infers the conflict target from the table's unique keys, so the
/// caller's `unique_by` list is not part of the clause.
pub(crate) fn upsert_suffix(
    grammar: &Grammar,
    query: &QueryModel,
    update: &UpsertUpdate,
    bindings: &mut Vec<Value>,
) -> Result<String> {
    let assignments = match update {
        UpsertUpdate::Columns(columns) => columns
            .iter()
            .map(|column| {
                let wrapped = grammar.wrap(query, column);
                Ok(format!("{wrapped} = values({wrapped})"))
            })
            .collect::<Result<Vec<_>>>()?,
        UpsertUpdate::Assignments(assignments) => assignments
            .iter()
            .map(|(column, operand)| {
                Ok(format!(
                    "{} = {}",
                    grammar.wrap(query, column),
                    grammar.parameter(query, operand, bindings)?
                ))
            })
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(format!(" on duplicate key update {}", assignments.join(", ")))
}

/// `truncate table t` as a single statement.
pub(crate) fn truncate(grammar: &Grammar, query: &QueryModel) -> Result<Vec<Compiled>> {
    let table = grammar.statement_table(query, "truncate")?;
    Ok(vec![Compiled {
        sql: format!("truncate table {}", grammar.wrap_table(query, table)),
        bindings: Vec::new(),
    }])
}
