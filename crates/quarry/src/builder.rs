//! Fluent builder over the query model.
//!
//! The builder owns a `QueryModel` and exposes chained mutation methods; the
//! compile methods hand the finished model to a `Grammar` and return the
//! `(sql, bindings)` pair. Builders are plain owned values — `clone()` a base
//! query to branch variants without sharing any nested structure.

use quarry_core::{Expression, Result, Value};
use quarry_grammar::{Compiled, Grammar, UpsertUpdate};
use quarry_query::{
    Aggregate, AggregateFunction, ConditionGroup, Connector, DatePart, Distinct, JoinClause,
    LockMode, Operand, OrderClause, Predicate, QueryModel, TableRef, UnionClause,
};

/// Turn `col = null` / `col != null` comparisons into null checks.
fn comparison_or_null(column: String, operator: &str, value: Operand) -> Predicate {
    if let Operand::Value(Value::Null) = &value {
        match operator {
            "=" => {
                return Predicate::Null {
                    column,
                    negated: false,
                };
            }
            "!=" | "<>" => {
                return Predicate::Null {
                    column,
                    negated: true,
                };
            }
            _ => {}
        }
    }
    Predicate::Comparison {
        column,
        operator: operator.to_string(),
        value,
    }
}

/// A fluent SQL query builder.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    model: QueryModel,
}

impl Builder {
    /// Start a query against a table (accepts `"posts as p"`).
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            model: QueryModel::table(table),
        }
    }

    /// Start a query against a sub-query with the given alias.
    pub fn from_subquery(inner: Builder, alias: impl Into<String>) -> Self {
        let mut model = QueryModel::new();
        model.set_from_subquery(inner.into_model(), alias);
        Self { model }
    }

    /// The underlying query model.
    pub fn model(&self) -> &QueryModel {
        &self.model
    }

    /// Consume the builder, yielding the model.
    pub fn into_model(self) -> QueryModel {
        self.model
    }

    // ==================== Select list ====================

    /// Select specific columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        for column in columns {
            self.model.add_column(*column);
        }
        self
    }

    /// Select a raw expression.
    pub fn select_raw(mut self, expr: impl Into<Expression>) -> Self {
        self.model.add_column(expr.into());
        self
    }

    /// Select a scalar sub-query with an alias.
    pub fn select_sub(mut self, inner: Builder, alias: impl Into<String>) -> Self {
        self.model.add_column_subquery(inner.into_model(), alias);
        self
    }

    /// Make this a DISTINCT query.
    pub fn distinct(mut self) -> Self {
        self.model.set_distinct(Distinct::All);
        self
    }

    /// Distinct on specific columns (`distinct on (...)` on PostgreSQL).
    pub fn distinct_on(mut self, columns: &[&str]) -> Self {
        self.model.set_distinct(Distinct::Columns(
            columns.iter().map(|c| (*c).to_string()).collect(),
        ));
        self
    }

    // ==================== Aggregates ====================

    /// `count(*)`.
    pub fn count(mut self) -> Self {
        self.model.set_aggregate(Aggregate::count_all());
        self
    }

    /// An aggregate over one column.
    pub fn aggregate(mut self, function: AggregateFunction, column: &str) -> Self {
        self.model
            .set_aggregate(Aggregate::new(function, vec![column.to_string()]));
        self
    }

    // ==================== Filters ====================

    /// Add an AND comparison filter.
    ///
    /// Comparing against `Value::Null` with `=` or `!=`/`<>` becomes the
    /// matching null check.
    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.model.add_where(
            Connector::And,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    /// Add an OR comparison filter.
    pub fn or_filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.model.add_where(
            Connector::Or,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    /// Add a nested AND group built by the closure.
    pub fn filter_group(mut self, build: impl FnOnce(Group) -> Group) -> Self {
        let group = build(Group::new());
        self.model
            .add_where(Connector::And, Predicate::Group(group.into_inner()));
        self
    }

    /// Add a nested OR group built by the closure.
    pub fn or_filter_group(mut self, build: impl FnOnce(Group) -> Group) -> Self {
        let group = build(Group::new());
        self.model
            .add_where(Connector::Or, Predicate::Group(group.into_inner()));
        self
    }

    /// `column in (values)`.
    pub fn filter_in(mut self, column: &str, values: Vec<Operand>) -> Self {
        self.model
            .add_where(Connector::And, Predicate::in_list(column, values));
        self
    }

    /// `column not in (values)`.
    pub fn filter_not_in(mut self, column: &str, values: Vec<Operand>) -> Self {
        self.model
            .add_where(Connector::And, Predicate::not_in_list(column, values));
        self
    }

    /// `column in (sub-query)`.
    pub fn filter_in_sub(mut self, column: &str, inner: Builder) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::in_subquery(column, inner.into_model()),
        );
        self
    }

    /// `column between low and high`.
    pub fn filter_between(
        mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.model
            .add_where(Connector::And, Predicate::between(column, low, high));
        self
    }

    /// `column is null`.
    pub fn filter_null(mut self, column: &str) -> Self {
        self.model
            .add_where(Connector::And, Predicate::is_null(column));
        self
    }

    /// `column is not null`.
    pub fn filter_not_null(mut self, column: &str) -> Self {
        self.model
            .add_where(Connector::And, Predicate::is_not_null(column));
        self
    }

    /// `exists (sub-query)`.
    pub fn filter_exists(mut self, inner: Builder) -> Self {
        self.model
            .add_where(Connector::And, Predicate::exists(inner.into_model()));
        self
    }

    /// `not exists (sub-query)`.
    pub fn filter_not_exists(mut self, inner: Builder) -> Self {
        self.model
            .add_where(Connector::And, Predicate::not_exists(inner.into_model()));
        self
    }

    /// A raw WHERE fragment, emitted verbatim with its bindings spliced in.
    pub fn filter_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::raw(Expression::with_bindings(sql.into(), bindings)),
        );
        self
    }

    /// Column-to-column comparison.
    pub fn filter_column(mut self, left: &str, operator: &str, right: &str) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::comparison(left, operator, Operand::column(right)),
        );
        self
    }

    /// JSON containment test.
    pub fn filter_json_contains(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::JsonContains {
                column: column.to_string(),
                value: value.into(),
                negated: false,
            },
        );
        self
    }

    /// JSON array length comparison.
    pub fn filter_json_length(
        mut self,
        column: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::JsonLength {
                column: column.to_string(),
                operator: operator.to_string(),
                value: value.into(),
            },
        );
        self
    }

    /// Compare one date component of a column.
    pub fn filter_date(
        mut self,
        part: DatePart,
        column: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> Self {
        self.model.add_where(
            Connector::And,
            Predicate::DateBased {
                part,
                column: column.to_string(),
                operator: operator.to_string(),
                value: value.into(),
            },
        );
        self
    }

    // ==================== Joins ====================

    /// INNER JOIN on a column equality (or other operator).
    pub fn join(self, table: impl Into<TableRef>, left: &str, operator: &str, right: &str) -> Self {
        self.join_clause(JoinClause::inner(table, on_columns(left, operator, right)))
    }

    /// LEFT JOIN on a column comparison.
    pub fn left_join(
        self,
        table: impl Into<TableRef>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> Self {
        self.join_clause(JoinClause::left(table, on_columns(left, operator, right)))
    }

    /// RIGHT JOIN on a column comparison.
    pub fn right_join(
        self,
        table: impl Into<TableRef>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> Self {
        self.join_clause(JoinClause::right(table, on_columns(left, operator, right)))
    }

    /// CROSS JOIN.
    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.join_clause(JoinClause::cross(table))
    }

    /// Add a fully-built join clause.
    pub fn join_clause(mut self, join: JoinClause) -> Self {
        self.model.add_join(join);
        self
    }

    // ==================== Grouping and having ====================

    /// Add GROUP BY columns.
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        for column in columns {
            self.model.add_group(*column);
        }
        self
    }

    /// Add an AND HAVING comparison.
    pub fn having(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.model.add_having(
            Connector::And,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    /// Add an OR HAVING comparison.
    pub fn or_having(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.model.add_having(
            Connector::Or,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    // ==================== Ordering and paging ====================

    /// Ascending order on a column.
    pub fn order_by(mut self, column: &str) -> Self {
        self.model.add_order(OrderClause::asc(column));
        self
    }

    /// Descending order on a column.
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.model.add_order(OrderClause::desc(column));
        self
    }

    /// Order by a raw expression.
    pub fn order_by_raw(mut self, expr: impl Into<Expression>) -> Self {
        self.model.add_order(OrderClause::Expression(expr.into()));
        self
    }

    /// Random ordering (dialect-specific function).
    pub fn in_random_order(mut self) -> Self {
        self.model.add_order(OrderClause::Random);
        self
    }

    /// Set the LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.model.set_limit(limit);
        self
    }

    /// Set the OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.model.set_offset(offset);
        self
    }

    // ==================== Unions and locks ====================

    /// `union <other>`.
    pub fn union(mut self, other: Builder) -> Self {
        self.model
            .add_union(UnionClause::distinct(other.into_model()));
        self
    }

    /// `union all <other>`.
    pub fn union_all(mut self, other: Builder) -> Self {
        self.model.add_union(UnionClause::all(other.into_model()));
        self
    }

    /// Request an exclusive row lock.
    pub fn lock_for_update(mut self) -> Self {
        self.model.set_lock(LockMode::ForUpdate);
        self
    }

    /// Request a shared row lock.
    pub fn share_lock(mut self) -> Self {
        self.model.set_lock(LockMode::Shared);
        self
    }

    // ==================== Compilation ====================

    /// Compile to a SELECT statement.
    pub fn to_sql(&self, grammar: &Grammar) -> Result<Compiled> {
        let compiled = grammar.compile_select(&self.model)?;
        tracing::debug!(sql = %compiled.sql, bindings = compiled.bindings.len(), "compiled select");
        Ok(compiled)
    }

    /// Compile to `select exists(...)`.
    pub fn to_exists_sql(&self, grammar: &Grammar) -> Result<Compiled> {
        grammar.compile_exists(&self.model)
    }

    /// Compile to a multi-row INSERT.
    pub fn to_insert_sql(
        &self,
        grammar: &Grammar,
        rows: &[Vec<(String, Operand)>],
    ) -> Result<Compiled> {
        let compiled = grammar.compile_insert(&self.model, rows)?;
        tracing::debug!(sql = %compiled.sql, rows = rows.len(), "compiled insert");
        Ok(compiled)
    }

    /// Compile to an INSERT that skips conflicting rows.
    pub fn to_insert_or_ignore_sql(
        &self,
        grammar: &Grammar,
        rows: &[Vec<(String, Operand)>],
    ) -> Result<Compiled> {
        grammar.compile_insert_or_ignore(&self.model, rows)
    }

    /// Compile to a single-row INSERT returning the new id where the dialect
    /// can express it.
    pub fn to_insert_get_id_sql(
        &self,
        grammar: &Grammar,
        row: &[(String, Operand)],
        sequence: Option<&str>,
    ) -> Result<Compiled> {
        grammar.compile_insert_get_id(&self.model, row, sequence)
    }

    /// Compile to an upsert.
    pub fn to_upsert_sql(
        &self,
        grammar: &Grammar,
        rows: &[Vec<(String, Operand)>],
        unique_by: &[String],
        update: &UpsertUpdate,
    ) -> Result<Compiled> {
        grammar.compile_upsert(&self.model, rows, unique_by, update)
    }

    /// Compile to an UPDATE with the model's joins and filters applied.
    pub fn to_update_sql(
        &self,
        grammar: &Grammar,
        assignments: &[(String, Operand)],
    ) -> Result<Compiled> {
        let compiled = grammar.compile_update(&self.model, assignments)?;
        tracing::debug!(sql = %compiled.sql, "compiled update");
        Ok(compiled)
    }

    /// Compile to a DELETE with the model's filters applied.
    pub fn to_delete_sql(&self, grammar: &Grammar) -> Result<Compiled> {
        let compiled = grammar.compile_delete(&self.model)?;
        tracing::debug!(sql = %compiled.sql, "compiled delete");
        Ok(compiled)
    }

    /// Compile to the dialect's truncate statement sequence.
    pub fn to_truncate_sql(&self, grammar: &Grammar) -> Result<Vec<Compiled>> {
        grammar.compile_truncate(&self.model)
    }
}

/// Build one column into an ON condition group.
fn on_columns(left: &str, operator: &str, right: &str) -> ConditionGroup {
    ConditionGroup::new().and(Predicate::comparison(
        left,
        operator,
        Operand::column(right),
    ))
}

/// Builder for a nested predicate group.
#[derive(Debug, Default)]
pub struct Group {
    group: ConditionGroup,
}

impl Group {
    fn new() -> Self {
        Self::default()
    }

    fn into_inner(self) -> ConditionGroup {
        self.group
    }

    /// Add an AND comparison.
    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.group.push(
            Connector::And,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    /// Add an OR comparison.
    pub fn or_filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.group.push(
            Connector::Or,
            comparison_or_null(column.to_string(), operator, value.into()),
        );
        self
    }

    /// `column is null`.
    pub fn filter_null(mut self, column: &str) -> Self {
        self.group.push(Connector::And, Predicate::is_null(column));
        self
    }

    /// `column in (values)`.
    pub fn filter_in(mut self, column: &str, values: Vec<Operand>) -> Self {
        self.group
            .push(Connector::And, Predicate::in_list(column, values));
        self
    }

    /// Nest a further AND group.
    pub fn filter_group(mut self, build: impl FnOnce(Group) -> Group) -> Self {
        let nested = build(Group::new());
        self.group
            .push(Connector::And, Predicate::Group(nested.into_inner()));
        self
    }

    /// Nest a further OR group.
    pub fn or_filter_group(mut self, build: impl FnOnce(Group) -> Group) -> Self {
        let nested = build(Group::new());
        self.group
            .push(Connector::Or, Predicate::Group(nested.into_inner()));
        self
    }
}
