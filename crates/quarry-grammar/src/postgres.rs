//! PostgreSQL-specific compilation hooks.

use crate::grammar::{Compiled, Grammar, UpsertUpdate};
use quarry_core::{Error, Result, Value};
use quarry_query::{DatePart, QueryModel};

/// Operators PostgreSQL accepts beyond the shared base set.
pub(crate) const OPERATOR_EXTRAS: &[&str] = &[
    "ilike",
    "not ilike",
    "~",
    "~*",
    "!~",
    "!~*",
    "~~",
    "~~*",
    "!~~",
    "!~~*",
    "similar to",
    "not similar to",
    "@>",
    "<@",
    "?",
    "?|",
    "?&",
    "#>",
    "#>>",
    "->",
    "->>",
];

/// Chain `->'segment'` accessors onto a wrapped column.
fn json_selector(column: &str, path: &[String]) -> String {
    let accessors: String = path
        .iter()
        .map(|segment| format!("->'{}'", segment.replace('\'', "''")))
        .collect();
    format!("({column}{accessors})")
}

/// `[not ](col->'path')::jsonb @> ?`
pub(crate) fn json_contains_sql(column: &str, path: &[String], negated: bool) -> String {
    let not = if negated { "not " } else { "" };
    format!("{not}{}::jsonb @> ?", json_selector(column, path))
}

/// `jsonb_array_length((col->'path')::jsonb) <op> <value>`
pub(crate) fn json_length_sql(column: &str, path: &[String], operator: &str, value: &str) -> String {
    format!(
        "jsonb_array_length({}::jsonb) {operator} {value}",
        json_selector(column, path)
    )
}

/// Date-part extraction via casts and `extract()`.
pub(crate) fn date_based_sql(part: DatePart, column: &str, operator: &str, value: &str) -> String {
    match part {
        DatePart::Date => format!("{column}::date {operator} {value}"),
        DatePart::Time => format!("{column}::time {operator} {value}"),
        DatePart::Day | DatePart::Month | DatePart::Year => {
            format!("extract({} from {column}) {operator} {value}", part.as_str())
        }
    }
}

/// ` on conflict (key) do update set a = excluded.a, b = ?`
///
/// Unlike MySQL, the conflict target is explicit, so `unique_by` must name at
/// least one column.
pub(crate) fn upsert_suffix(
    grammar: &Grammar,
    query: &QueryModel,
    unique_by: &[String],
    update: &UpsertUpdate,
    bindings: &mut Vec<Value>,
) -> Result<String> {
    if unique_by.is_empty() {
        return Err(Error::MalformedStatement {
            statement: "upsert",
            message: "a conflict target column is required".to_string(),
        });
    }
    let target: Vec<String> = unique_by.iter().map(|c| grammar.wrap(query, c)).collect();

    let excluded = grammar.wrap_value("excluded");
    let assignments = match update {
        UpsertUpdate::Columns(columns) => columns
            .iter()
            .map(|column| {
                let wrapped = grammar.wrap(query, column);
                Ok(format!("{wrapped} = {excluded}.{wrapped}"))
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

    Ok(format!(
        " on conflict ({}) do update set {}",
        target.join(", "),
        assignments.join(", ")
    ))
}

/// `truncate t restart identity cascade` as a single statement.
pub(crate) fn truncate(grammar: &Grammar, query: &QueryModel) -> Result<Vec<Compiled>> {
    let table = grammar.statement_table(query, "truncate")?;
    Ok(vec![Compiled {
        sql: format!(
            "truncate {} restart identity cascade",
            grammar.wrap_table(query, table)
        ),
        bindings: Vec::new(),
    }])
}
