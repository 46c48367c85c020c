//! Predicate tree compilation for WHERE, HAVING, and JOIN ON clauses.

use crate::dialect::Dialect;
use crate::grammar::Grammar;
use crate::{json, mysql, postgres, sqlite};
use quarry_core::{Error, Result, Value};
use quarry_query::{ConditionGroup, InSource, Predicate, QueryModel};

impl Grammar {
    /// Render a condition group, collecting bindings in emission order.
    ///
    /// The root group of a clause renders bare; nested groups render
    /// parenthesized. The first conjunct's connector is never emitted;
    /// every later conjunct's connector renders literally. A conjunct that
    /// renders to nothing (an empty nested group) contributes neither text
    /// nor a connector, so the surrounding clause stays well-formed.
    pub(crate) fn condition_group_sql(
        &self,
        query: &QueryModel,
        group: &ConditionGroup,
        bindings: &mut Vec<Value>,
        nested: bool,
    ) -> Result<String> {
        let mut parts: Vec<String> = Vec::with_capacity(group.len());
        for conjunct in group {
            let sql = self.predicate_sql(query, &conjunct.predicate, bindings)?;
            if sql.is_empty() {
                continue;
            }
            if parts.is_empty() {
                parts.push(sql);
            } else {
                parts.push(format!("{} {sql}", conjunct.connector.as_str()));
            }
        }

        if parts.is_empty() {
            return Ok(String::new());
        }
        let body = parts.join(" ");
        Ok(if nested { format!("({body})") } else { body })
    }

    fn predicate_sql(
        &self,
        query: &QueryModel,
        predicate: &Predicate,
        bindings: &mut Vec<Value>,
    ) -> Result<String> {
        match predicate {
            Predicate::Comparison {
                column,
                operator,
                value,
            } => {
                nonempty_column(column, "comparison")?;
                let operator = self.verify_operator(operator, "comparison")?;
                let value = self.parameter(query, value, bindings)?;
                Ok(format!("{} {operator} {value}", self.wrap(query, column)))
            }

            Predicate::In {
                column,
                source,
                negated,
            } => {
                nonempty_column(column, "in")?;
                match source {
                    InSource::List(values) if values.is_empty() => {
                        // An empty candidate set is a constant predicate, not
                        // invalid `in ()` syntax.
                        Ok(if *negated { "1 = 1" } else { "0 = 1" }.to_string())
                    }
                    InSource::List(values) => {
                        let rendered = values
                            .iter()
                            .map(|v| self.parameter(query, v, bindings))
                            .collect::<Result<Vec<_>>>()?;
                        Ok(format!(
                            "{} {}in ({})",
                            self.wrap(query, column),
                            if *negated { "not " } else { "" },
                            rendered.join(", ")
                        ))
                    }
                    InSource::Subquery(sub) => Ok(format!(
                        "{} {}in ({})",
                        self.wrap(query, column),
                        if *negated { "not " } else { "" },
                        self.select_sql(sub, bindings)?
                    )),
                }
            }

            Predicate::Between {
                column,
                low,
                high,
                negated,
            } => {
                nonempty_column(column, "between")?;
                let low = self.parameter(query, low, bindings)?;
                let high = self.parameter(query, high, bindings)?;
                Ok(format!(
                    "{} {}between {low} and {high}",
                    self.wrap(query, column),
                    if *negated { "not " } else { "" }
                ))
            }

            Predicate::Null { column, negated } => {
                nonempty_column(column, "null")?;
                Ok(format!(
                    "{} is{} null",
                    self.wrap(query, column),
                    if *negated { " not" } else { "" }
                ))
            }

            Predicate::Exists { query: sub, negated } => Ok(format!(
                "{}exists ({})",
                if *negated { "not " } else { "" },
                self.select_sql(sub, bindings)?
            )),

            Predicate::Raw(expr) => {
                bindings.extend(expr.bindings().iter().cloned());
                Ok(expr.sql().to_string())
            }

            Predicate::Group(group) => self.condition_group_sql(query, group, bindings, true),

            Predicate::JsonContains {
                column,
                value,
                negated,
            } => {
                nonempty_column(column, "json contains")?;
                if !self.dialect().supports_json_contains() {
                    return Err(Error::UnknownDialectFeature {
                        feature: "json contains",
                        dialect: self.dialect().name(),
                    });
                }
                let (field, path) = json::split_column(column);
                let wrapped = self.wrap(query, field);
                bindings.push(value.clone());
                Ok(match self.dialect() {
                    Dialect::MySql => mysql::json_contains_sql(&wrapped, &path, *negated),
                    Dialect::Postgres => postgres::json_contains_sql(&wrapped, &path, *negated),
                    Dialect::Sqlite => unreachable!("rejected above"),
                })
            }

            Predicate::JsonLength {
                column,
                operator,
                value,
            } => {
                nonempty_column(column, "json length")?;
                let operator = self.verify_operator(operator, "json length")?;
                let (field, path) = json::split_column(column);
                let wrapped = self.wrap(query, field);
                let value = self.parameter(query, value, bindings)?;
                Ok(match self.dialect() {
                    Dialect::MySql => mysql::json_length_sql(&wrapped, &path, &operator, &value),
                    Dialect::Postgres => {
                        postgres::json_length_sql(&wrapped, &path, &operator, &value)
                    }
                    Dialect::Sqlite => sqlite::json_length_sql(&wrapped, &path, &operator, &value),
                })
            }

            Predicate::DateBased {
                part,
                column,
                operator,
                value,
            } => {
                nonempty_column(column, "date")?;
                let operator = self.verify_operator(operator, "date")?;
                let wrapped = self.wrap(query, column);
                let value = self.parameter(query, value, bindings)?;
                Ok(match self.dialect() {
                    Dialect::MySql => mysql::date_based_sql(*part, &wrapped, &operator, &value),
                    Dialect::Postgres => {
                        postgres::date_based_sql(*part, &wrapped, &operator, &value)
                    }
                    Dialect::Sqlite => sqlite::date_based_sql(*part, &wrapped, &operator, &value),
                })
            }
        }
    }

    /// Lowercase the operator and check it against the dialect whitelist.
    fn verify_operator(&self, operator: &str, clause: &'static str) -> Result<String> {
        let normalized = operator.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::MalformedPredicate {
                clause,
                message: "empty operator".to_string(),
            });
        }
        if !self.dialect().supports_operator(&normalized) {
            return Err(Error::UnsupportedOperator {
                operator: operator.to_string(),
                dialect: self.dialect().name(),
            });
        }
        Ok(normalized)
    }
}

fn nonempty_column(column: &str, clause: &'static str) -> Result<()> {
    if column.trim().is_empty() {
        return Err(Error::MalformedPredicate {
            clause,
            message: "empty column name".to_string(),
        });
    }
    Ok(())
}
