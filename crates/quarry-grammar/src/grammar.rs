//! The base grammar: identifier wrapping, table prefixing, and statement
//! compilation.
//!
//! A `Grammar` is stateless across calls: its only state is the dialect and
//! the table prefix fixed at construction. Every compile entry point walks a
//! read-only `QueryModel` in a fixed clause order and threads a single
//! binding collector through the walk, so the returned bindings always match
//! the left-to-right placeholder order of the returned SQL.

use crate::dialect::Dialect;
use crate::{mysql, postgres, sqlite};
use quarry_core::{Error, Result, Value, quote_with};
use quarry_query::{
    Aggregate, Distinct, JoinKind, LockMode, Operand, OrderClause, QueryModel, SelectItem,
    TableRef, TableSource,
};

/// A compiled statement: SQL text plus bindings in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub bindings: Vec<Value>,
}

/// The update action of an upsert when a conflicting row exists.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertUpdate {
    /// Overwrite these columns with the values from the rejected insert row
    /// (`values(col)` on MySQL, `excluded.col` elsewhere).
    Columns(Vec<String>),
    /// Explicit assignments.
    Assignments(Vec<(String, Operand)>),
}

/// The dialect compiler for query models.
#[derive(Debug, Clone)]
pub struct Grammar {
    dialect: Dialect,
    table_prefix: String,
}

impl Grammar {
    /// A grammar for the given dialect with no table prefix.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_table_prefix(dialect, "")
    }

    /// A grammar with a table prefix, supplied by the connection layer.
    pub fn with_table_prefix(dialect: Dialect, prefix: impl Into<String>) -> Self {
        Self {
            dialect,
            table_prefix: prefix.into(),
        }
    }

    /// The active dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The configured table prefix.
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    // ==================== Identifier wrapping ====================

    /// Wrap a (possibly qualified, possibly aliased) identifier.
    ///
    /// This is the single choke point for quoting and prefixing: every
    /// table or column reference the grammar emits goes through here. The
    /// first segment of a qualified name (`t.col`) is treated as a table
    /// reference and resolved against the model's registered aliases and the
    /// table prefix; all other segments are quoted as-is. `*` is never
    /// quoted.
    pub fn wrap(&self, query: &QueryModel, value: &str) -> String {
        if let Some((head, alias)) = value.split_once(" as ") {
            return format!(
                "{} as {}",
                self.wrap(query, head.trim_end()),
                self.wrap_value(alias.trim_start())
            );
        }

        let segments: Vec<&str> = value.split('.').collect();
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == 0 && segments.len() > 1 {
                    self.wrap_table_name(query, segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap a table reference, applying the prefix and quoting the alias.
    ///
    /// Aliases are quoted but never prefixed.
    pub fn wrap_table(&self, query: &QueryModel, table: &TableRef) -> String {
        let wrapped = self.wrap_table_name(query, &table.name);
        match &table.alias {
            Some(alias) => format!("{} as {}", wrapped, self.wrap_value(alias)),
            None => wrapped,
        }
    }

    /// Resolve one identifier in table position.
    ///
    /// Registered aliases stay unprefixed; names already carrying the prefix
    /// are not prefixed again.
    fn wrap_table_name(&self, query: &QueryModel, name: &str) -> String {
        if query.is_known_alias(name) {
            return self.wrap_value(name);
        }
        self.wrap_value(&self.prefixed(name))
    }

    /// Apply the table prefix unless the name already starts with it.
    fn prefixed(&self, name: &str) -> String {
        if self.table_prefix.is_empty() || name.starts_with(&self.table_prefix) {
            name.to_string()
        } else {
            format!("{}{}", self.table_prefix, name)
        }
    }

    /// Quote a single identifier segment with the dialect's quote character.
    pub(crate) fn wrap_value(&self, segment: &str) -> String {
        quote_with(self.dialect.quote_char(), segment)
    }

    // ==================== Operands ====================

    /// Render one operand, collecting bindings.
    ///
    /// Values become `?` placeholders; expressions are emitted verbatim with
    /// their sub-bindings spliced in; columns are wrapped; sub-queries are
    /// compiled recursively in parentheses.
    pub(crate) fn parameter(
        &self,
        query: &QueryModel,
        operand: &Operand,
        bindings: &mut Vec<Value>,
    ) -> Result<String> {
        match operand {
            Operand::Value(value) => {
                bindings.push(value.clone());
                Ok("?".to_string())
            }
            Operand::Expression(expr) => {
                bindings.extend(expr.bindings().iter().cloned());
                Ok(expr.sql().to_string())
            }
            Operand::Column(column) => Ok(self.wrap(query, column)),
            Operand::Subquery(sub) => {
                let mut sql = String::from("(");
                sql.push_str(&self.select_sql(sub, bindings)?);
                sql.push(')');
                Ok(sql)
            }
        }
    }

    // ==================== SELECT ====================

    /// Compile a SELECT statement.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile_select(&self, query: &QueryModel) -> Result<Compiled> {
        let mut bindings = Vec::new();
        let sql = self.select_sql(query, &mut bindings)?;
        Ok(Compiled { sql, bindings })
    }

    /// Compile a SELECT wrapped in `select exists(...)`.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile_exists(&self, query: &QueryModel) -> Result<Compiled> {
        let mut bindings = Vec::new();
        let inner = self.select_sql(query, &mut bindings)?;
        let sql = format!("select exists({inner}) as {}", self.wrap_value("exists"));
        Ok(Compiled { sql, bindings })
    }

    /// Render a full select, threading the shared binding collector.
    ///
    /// Clause order is fixed: aggregate-or-columns, from, joins, wheres,
    /// groups, havings, orders, limit, offset, unions, lock. Absent clauses
    /// are omitted entirely.
    pub(crate) fn select_sql(
        &self,
        query: &QueryModel,
        bindings: &mut Vec<Value>,
    ) -> Result<String> {
        let mut sql = String::from("select ");

        if let Some(aggregate) = query.aggregate() {
            sql.push_str(&self.aggregate_sql(query, aggregate));
        } else {
            sql.push_str(&self.distinct_sql(query));
            if query.columns().is_empty() {
                sql.push('*');
            } else {
                let columns = query
                    .columns()
                    .iter()
                    .map(|item| self.select_item_sql(query, item, bindings))
                    .collect::<Result<Vec<_>>>()?;
                sql.push_str(&columns.join(", "));
            }
        }

        if let Some(from) = query.from() {
            sql.push_str(" from ");
            match from {
                TableSource::Table(table) => sql.push_str(&self.wrap_table(query, table)),
                TableSource::Subquery { query: sub, alias } => {
                    sql.push('(');
                    sql.push_str(&self.select_sql(sub, bindings)?);
                    sql.push_str(&format!(") as {}", self.wrap_value(alias)));
                }
            }
        }

        for join in query.joins() {
            sql.push(' ');
            sql.push_str(join.kind.as_str());
            sql.push(' ');
            sql.push_str(&self.wrap_table(query, &join.table));
            if join.kind != JoinKind::Cross && !join.on.is_empty() {
                sql.push_str(" on ");
                sql.push_str(&self.condition_group_sql(query, &join.on, bindings, false)?);
            }
        }

        let wheres = self.condition_group_sql(query, query.wheres(), bindings, false)?;
        if !wheres.is_empty() {
            sql.push_str(" where ");
            sql.push_str(&wheres);
        }

        if !query.groups().is_empty() {
            let groups = query
                .groups()
                .iter()
                .map(|item| self.select_item_sql(query, item, bindings))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" group by ");
            sql.push_str(&groups.join(", "));
        }

        let havings = self.condition_group_sql(query, query.havings(), bindings, false)?;
        if !havings.is_empty() {
            sql.push_str(" having ");
            sql.push_str(&havings);
        }

        if !query.orders().is_empty() {
            let orders: Vec<String> = query
                .orders()
                .iter()
                .map(|order| self.order_sql(query, order, bindings))
                .collect();
            sql.push_str(" order by ");
            sql.push_str(&orders.join(", "));
        }

        if let Some(limit) = query.limit() {
            sql.push_str(&format!(" limit {limit}"));
        }

        if let Some(offset) = query.offset() {
            sql.push_str(&format!(" offset {offset}"));
        }

        for union in query.unions() {
            sql.push_str(if union.all { " union all " } else { " union " });
            sql.push_str(&self.select_sql(&union.query, bindings)?);
        }

        if let Some(mode) = query.lock() {
            let clause = self.dialect.lock_clause(mode);
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(clause);
            }
        }

        Ok(sql)
    }

    fn distinct_sql(&self, query: &QueryModel) -> String {
        match query.distinct() {
            Distinct::Off => String::new(),
            Distinct::Columns(columns) if self.dialect.supports_distinct_on() => {
                let wrapped: Vec<String> =
                    columns.iter().map(|c| self.wrap(query, c)).collect();
                format!("distinct on ({}) ", wrapped.join(", "))
            }
            Distinct::All | Distinct::Columns(_) => "distinct ".to_string(),
        }
    }

    fn select_item_sql(
        &self,
        query: &QueryModel,
        item: &SelectItem,
        bindings: &mut Vec<Value>,
    ) -> Result<String> {
        match item {
            SelectItem::Column(column) => Ok(self.wrap(query, column)),
            SelectItem::Expression(expr) => {
                bindings.extend(expr.bindings().iter().cloned());
                Ok(expr.sql().to_string())
            }
            SelectItem::Subquery { query: sub, alias } => Ok(format!(
                "({}) as {}",
                self.select_sql(sub, bindings)?,
                self.wrap_value(alias)
            )),
        }
    }

    fn aggregate_sql(&self, query: &QueryModel, aggregate: &Aggregate) -> String {
        let columns = if aggregate.columns.is_empty() {
            "*".to_string()
        } else {
            let wrapped: Vec<String> = aggregate
                .columns
                .iter()
                .map(|c| self.wrap(query, c))
                .collect();
            wrapped.join(", ")
        };
        let inner = if query.distinct().is_on() && columns != "*" {
            format!("distinct {columns}")
        } else {
            columns
        };
        format!("{}({inner}) as aggregate", aggregate.function.as_str())
    }

    fn order_sql(
        &self,
        query: &QueryModel,
        order: &OrderClause,
        bindings: &mut Vec<Value>,
    ) -> String {
        match order {
            OrderClause::Column { column, direction } => {
                format!("{} {}", self.wrap(query, column), direction.as_str())
            }
            OrderClause::Expression(expr) => {
                bindings.extend(expr.bindings().iter().cloned());
                expr.sql().to_string()
            }
            OrderClause::Random => format!("{}()", self.dialect.random_function()),
        }
    }

    // ==================== INSERT ====================

    /// Compile a multi-row INSERT.
    ///
    /// All rows must share one column list; zero rows compile to the
    /// dialect's default-values form.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile_insert(
        &self,
        query: &QueryModel,
        rows: &[Vec<(String, Operand)>],
    ) -> Result<Compiled> {
        let table = self.statement_table(query, "insert")?;
        let wrapped_table = self.wrap_table(query, table);

        if rows.is_empty() {
            return Ok(Compiled {
                sql: self.dialect.default_values_sql(&wrapped_table),
                bindings: Vec::new(),
            });
        }

        let mut bindings = Vec::new();
        let body = self.insert_body(query, rows, &mut bindings)?;
        Ok(Compiled {
            sql: format!("insert into {wrapped_table} {body}"),
            bindings,
        })
    }

    /// Compile an INSERT that skips conflicting rows.
    pub fn compile_insert_or_ignore(
        &self,
        query: &QueryModel,
        rows: &[Vec<(String, Operand)>],
    ) -> Result<Compiled> {
        let table = self.statement_table(query, "insert")?;
        if rows.is_empty() {
            return Err(Error::MalformedStatement {
                statement: "insert",
                message: "insert or ignore requires at least one row".to_string(),
            });
        }
        let wrapped_table = self.wrap_table(query, table);
        let mut bindings = Vec::new();
        let body = self.insert_body(query, rows, &mut bindings)?;
        Ok(Compiled {
            sql: format!(
                "{} {wrapped_table} {body}{}",
                self.dialect.insert_ignore_keyword(),
                self.dialect.insert_ignore_suffix()
            ),
            bindings,
        })
    }

    /// Compile a single-row INSERT that yields the new row id.
    ///
    /// PostgreSQL appends `returning <sequence>` (default `id`); the other
    /// dialects report the id out of band, so their SQL is a plain insert.
    pub fn compile_insert_get_id(
        &self,
        query: &QueryModel,
        row: &[(String, Operand)],
        sequence: Option<&str>,
    ) -> Result<Compiled> {
        let rows = vec![row.to_vec()];
        let mut compiled = self.compile_insert(query, &rows)?;
        if self.dialect == Dialect::Postgres {
            let column = sequence.unwrap_or("id");
            compiled.sql.push_str(&format!(" returning {}", self.wrap(query, column)));
        }
        Ok(compiled)
    }

    /// Compile an upsert: insert rows, updating on conflict.
    pub fn compile_upsert(
        &self,
        query: &QueryModel,
        rows: &[Vec<(String, Operand)>],
        unique_by: &[String],
        update: &UpsertUpdate,
    ) -> Result<Compiled> {
        let table = self.statement_table(query, "upsert")?;
        if rows.is_empty() {
            return Err(Error::MalformedStatement {
                statement: "upsert",
                message: "upsert requires at least one row".to_string(),
            });
        }
        let wrapped_table = self.wrap_table(query, table);
        let mut bindings = Vec::new();
        let body = self.insert_body(query, rows, &mut bindings)?;
        let suffix = match self.dialect {
            Dialect::MySql => mysql::upsert_suffix(self, query, update, &mut bindings)?,
            Dialect::Postgres => {
                postgres::upsert_suffix(self, query, unique_by, update, &mut bindings)?
            }
            Dialect::Sqlite => {
                sqlite::upsert_suffix(self, query, unique_by, update, &mut bindings)?
            }
        };
        Ok(Compiled {
            sql: format!("insert into {wrapped_table} {body}{suffix}"),
            bindings,
        })
    }

    /// Render `(columns) values (...), (...)` for insert-family statements.
    fn insert_body(
        &self,
        query: &QueryModel,
        rows: &[Vec<(String, Operand)>],
        bindings: &mut Vec<Value>,
    ) -> Result<String> {
        let columns: Vec<&str> = rows[0].iter().map(|(c, _)| c.as_str()).collect();
        for row in &rows[1..] {
            let row_columns: Vec<&str> = row.iter().map(|(c, _)| c.as_str()).collect();
            if row_columns != columns {
                return Err(Error::MalformedStatement {
                    statement: "insert",
                    message: "all rows must share one column list".to_string(),
                });
            }
        }

        let wrapped: Vec<String> = columns.iter().map(|c| self.wrap(query, c)).collect();
        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let placeholders = row
                .iter()
                .map(|(_, operand)| self.parameter(query, operand, bindings))
                .collect::<Result<Vec<_>>>()?;
            groups.push(format!("({})", placeholders.join(", ")));
        }
        Ok(format!("({}) values {}", wrapped.join(", "), groups.join(", ")))
    }

    // ==================== UPDATE / DELETE ====================

    /// Compile an UPDATE of the model's table.
    ///
    /// The model's joins and wheres apply; SET bindings precede WHERE
    /// bindings in the returned order because the collector follows emission
    /// order.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile_update(
        &self,
        query: &QueryModel,
        assignments: &[(String, Operand)],
    ) -> Result<Compiled> {
        let table = self.statement_table(query, "update")?;
        if assignments.is_empty() {
            return Err(Error::MalformedStatement {
                statement: "update",
                message: "update requires at least one assignment".to_string(),
            });
        }

        let mut bindings = Vec::new();
        let mut sql = format!("update {}", self.wrap_table(query, table));

        for join in query.joins() {
            sql.push(' ');
            sql.push_str(join.kind.as_str());
            sql.push(' ');
            sql.push_str(&self.wrap_table(query, &join.table));
            if join.kind != JoinKind::Cross && !join.on.is_empty() {
                sql.push_str(" on ");
                sql.push_str(&self.condition_group_sql(query, &join.on, &mut bindings, false)?);
            }
        }

        let sets = assignments
            .iter()
            .map(|(column, operand)| {
                Ok(format!(
                    "{} = {}",
                    self.wrap(query, column),
                    self.parameter(query, operand, &mut bindings)?
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        sql.push_str(" set ");
        sql.push_str(&sets.join(", "));

        let wheres = self.condition_group_sql(query, query.wheres(), &mut bindings, false)?;
        if !wheres.is_empty() {
            sql.push_str(" where ");
            sql.push_str(&wheres);
        }

        Ok(Compiled { sql, bindings })
    }

    /// Compile a DELETE of the model's table.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile_delete(&self, query: &QueryModel) -> Result<Compiled> {
        let table = self.statement_table(query, "delete")?;
        let mut bindings = Vec::new();
        let mut sql = format!("delete from {}", self.wrap_table(query, table));

        let wheres = self.condition_group_sql(query, query.wheres(), &mut bindings, false)?;
        if !wheres.is_empty() {
            sql.push_str(" where ");
            sql.push_str(&wheres);
        }

        Ok(Compiled { sql, bindings })
    }

    /// The row-lock clause for a lock request.
    ///
    /// Empty on dialects without lock support: the request is a silent
    /// no-op there, never an error.
    pub fn compile_lock(&self, mode: LockMode) -> &'static str {
        self.dialect.lock_clause(mode)
    }

    // ==================== TRUNCATE ====================

    /// Compile a truncate as an ordered statement sequence.
    ///
    /// A single statement on MySQL and PostgreSQL; SQLite resets the
    /// auxiliary sequence table before deleting, so two statements.
    pub fn compile_truncate(&self, query: &QueryModel) -> Result<Vec<Compiled>> {
        match self.dialect {
            Dialect::MySql => mysql::truncate(self, query),
            Dialect::Postgres => postgres::truncate(self, query),
            Dialect::Sqlite => sqlite::truncate(self, query),
        }
    }

    /// The named target table of a write statement.
    pub(crate) fn statement_table<'a>(
        &self,
        query: &'a QueryModel,
        statement: &'static str,
    ) -> Result<&'a TableRef> {
        match query.from() {
            Some(TableSource::Table(table)) => Ok(table),
            Some(TableSource::Subquery { .. }) => Err(Error::MalformedStatement {
                statement,
                message: "target must be a named table, not a sub-query".to_string(),
            }),
            None => Err(Error::MalformedStatement {
                statement,
                message: "no target table set".to_string(),
            }),
        }
    }

    /// The prefixed (unquoted) form of a statement's target table name.
    pub(crate) fn prefixed_table_name(&self, table: &TableRef) -> String {
        self.prefixed(&table.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_query::{Connector, Predicate};

    fn postgres() -> Grammar {
        Grammar::new(Dialect::Postgres)
    }

    #[test]
    fn select_star_from_table() {
        let query = QueryModel::table("users");
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select * from \"users\"");
        assert!(compiled.bindings.is_empty());
    }

    #[test]
    fn select_columns_are_wrapped() {
        let mut query = QueryModel::table("users");
        query.add_column("id");
        query.add_column("users.name");
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select \"id\", \"users\".\"name\" from \"users\"");
    }

    #[test]
    fn select_aliased_column() {
        let mut query = QueryModel::table("users");
        query.add_column("name as n");
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select \"name\" as \"n\" from \"users\"");
    }

    #[test]
    fn mysql_uses_backticks() {
        let query = QueryModel::table("users");
        let compiled = Grammar::new(Dialect::MySql).compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select * from `users`");
    }

    #[test]
    fn table_prefix_applies_to_tables_not_columns() {
        let mut query = QueryModel::table("users");
        query.add_column("name");
        let grammar = Grammar::with_table_prefix(Dialect::Postgres, "app_");
        let compiled = grammar.compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select \"name\" from \"app_users\"");
    }

    #[test]
    fn already_prefixed_table_is_not_prefixed_again() {
        let query = QueryModel::table("app_users");
        let grammar = Grammar::with_table_prefix(Dialect::Postgres, "app_");
        let compiled = grammar.compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select * from \"app_users\"");
    }

    #[test]
    fn alias_is_quoted_but_never_prefixed() {
        let mut query = QueryModel::table("posts as p");
        query.add_where(
            Connector::And,
            Predicate::comparison("p.title", "=", "hello"),
        );
        let grammar = Grammar::with_table_prefix(Dialect::Postgres, "wp_");
        let compiled = grammar.compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select * from \"wp_posts\" as \"p\" where \"p\".\"title\" = ?"
        );
        assert_eq!(compiled.bindings, vec![Value::Text("hello".to_string())]);
    }

    #[test]
    fn select_distinct() {
        let mut query = QueryModel::table("orders");
        query.add_column("status");
        query.set_distinct(Distinct::All);
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select distinct \"status\" from \"orders\"");
    }

    #[test]
    fn distinct_on_is_postgres_only() {
        let mut query = QueryModel::table("orders");
        query.add_column("status");
        query.set_distinct(Distinct::Columns(vec!["customer_id".to_string()]));

        let pg = postgres().compile_select(&query).unwrap();
        assert_eq!(
            pg.sql,
            "select distinct on (\"customer_id\") \"status\" from \"orders\""
        );

        let sqlite = Grammar::new(Dialect::Sqlite).compile_select(&query).unwrap();
        assert_eq!(sqlite.sql, "select distinct \"status\" from \"orders\"");
    }

    #[test]
    fn aggregate_wins_over_columns() {
        let mut query = QueryModel::table("users");
        query.add_column("name");
        query.set_aggregate(Aggregate::count_all());
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select count(*) as aggregate from \"users\"");
    }

    #[test]
    fn distinct_aggregate_on_column() {
        let mut query = QueryModel::table("users");
        query.set_distinct(Distinct::All);
        query.set_aggregate(Aggregate::new(
            quarry_query::AggregateFunction::Count,
            vec!["email".to_string()],
        ));
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select count(distinct \"email\") as aggregate from \"users\""
        );
    }

    #[test]
    fn limit_and_offset() {
        let mut query = QueryModel::table("users");
        query.set_limit(10);
        query.set_offset(20);
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "select * from \"users\" limit 10 offset 20");
    }

    #[test]
    fn order_by_columns_and_random() {
        let mut query = QueryModel::table("users");
        query.add_order(OrderClause::asc("name"));
        query.add_order(OrderClause::desc("age"));
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select * from \"users\" order by \"name\" asc, \"age\" desc"
        );

        let mut random = QueryModel::table("users");
        random.add_order(OrderClause::Random);
        assert_eq!(
            postgres().compile_select(&random).unwrap().sql,
            "select * from \"users\" order by random()"
        );
        assert_eq!(
            Grammar::new(Dialect::MySql).compile_select(&random).unwrap().sql,
            "select * from `users` order by rand()"
        );
    }

    #[test]
    fn unions_follow_limit() {
        let mut query = QueryModel::table("users");
        query.set_limit(5);
        query.add_union(quarry_query::UnionClause::all(QueryModel::table("admins")));
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select * from \"users\" limit 5 union all select * from \"admins\""
        );
    }

    #[test]
    fn from_subquery_with_alias() {
        let mut inner = QueryModel::table("events");
        inner.add_where(Connector::And, Predicate::comparison("kind", "=", "click"));
        let mut query = QueryModel::new();
        query.set_from_subquery(inner, "recent");
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select * from (select * from \"events\" where \"kind\" = ?) as \"recent\""
        );
        assert_eq!(compiled.bindings, vec![Value::Text("click".to_string())]);
    }

    #[test]
    fn scalar_subquery_select() {
        let mut counts = QueryModel::table("orders");
        counts.set_aggregate(Aggregate::count_all());
        let mut query = QueryModel::table("users");
        query.add_column("name");
        query.add_column_subquery(counts, "order_count");
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select \"name\", (select count(*) as aggregate from \"orders\") as \"order_count\" from \"users\""
        );
    }

    #[test]
    fn exists_statement() {
        let mut query = QueryModel::table("users");
        query.add_where(Connector::And, Predicate::comparison("id", "=", 7));
        let compiled = postgres().compile_exists(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select exists(select * from \"users\" where \"id\" = ?) as \"exists\""
        );
        assert_eq!(compiled.bindings, vec![Value::Int(7)]);
    }

    #[test]
    fn lock_clauses_per_dialect() {
        let mut query = QueryModel::table("users");
        query.set_lock(quarry_query::LockMode::Shared);

        assert_eq!(
            Grammar::new(Dialect::MySql).compile_select(&query).unwrap().sql,
            "select * from `users` lock in share mode"
        );
        assert_eq!(
            postgres().compile_select(&query).unwrap().sql,
            "select * from \"users\" for share"
        );
        // A lock request is a silent no-op on SQLite.
        assert_eq!(
            Grammar::new(Dialect::Sqlite).compile_select(&query).unwrap().sql,
            "select * from \"users\""
        );
    }

    #[test]
    fn insert_multiple_rows() {
        let query = QueryModel::table("users");
        let rows = vec![
            vec![
                ("email".to_string(), Operand::from("a@example.com")),
                ("name".to_string(), Operand::from("A")),
            ],
            vec![
                ("email".to_string(), Operand::from("b@example.com")),
                ("name".to_string(), Operand::from("B")),
            ],
        ];
        let compiled = postgres().compile_insert(&query, &rows).unwrap();
        assert_eq!(
            compiled.sql,
            "insert into \"users\" (\"email\", \"name\") values (?, ?), (?, ?)"
        );
        assert_eq!(compiled.bindings.len(), 4);
    }

    #[test]
    fn insert_zero_rows_uses_default_values() {
        let query = QueryModel::table("users");
        assert_eq!(
            postgres().compile_insert(&query, &[]).unwrap().sql,
            "insert into \"users\" default values"
        );
        assert_eq!(
            Grammar::new(Dialect::MySql).compile_insert(&query, &[]).unwrap().sql,
            "insert into `users` () values ()"
        );
    }

    #[test]
    fn insert_rejects_mismatched_rows() {
        let query = QueryModel::table("users");
        let rows = vec![
            vec![("email".to_string(), Operand::from("a@example.com"))],
            vec![("name".to_string(), Operand::from("B"))],
        ];
        let err = postgres().compile_insert(&query, &rows).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn insert_get_id_returns_on_postgres_only() {
        let query = QueryModel::table("users");
        let row = vec![("email".to_string(), Operand::from("a@example.com"))];

        let pg = postgres().compile_insert_get_id(&query, &row, None).unwrap();
        assert_eq!(
            pg.sql,
            "insert into \"users\" (\"email\") values (?) returning \"id\""
        );

        let mysql = Grammar::new(Dialect::MySql)
            .compile_insert_get_id(&query, &row, None)
            .unwrap();
        assert_eq!(mysql.sql, "insert into `users` (`email`) values (?)");
    }

    #[test]
    fn update_bindings_precede_wheres() {
        let mut query = QueryModel::table("users");
        query.add_where(Connector::And, Predicate::comparison("id", "=", 1));
        let assignments = vec![("name".to_string(), Operand::from("New"))];
        let compiled = postgres().compile_update(&query, &assignments).unwrap();
        assert_eq!(
            compiled.sql,
            "update \"users\" set \"name\" = ? where \"id\" = ?"
        );
        assert_eq!(
            compiled.bindings,
            vec![Value::Text("New".to_string()), Value::Int(1)]
        );
    }

    #[test]
    fn update_requires_assignments() {
        let query = QueryModel::table("users");
        assert!(postgres().compile_update(&query, &[]).unwrap_err().is_malformed());
    }

    #[test]
    fn delete_with_wheres() {
        let mut query = QueryModel::table("users");
        query.add_where(Connector::And, Predicate::comparison("id", "=", 3));
        let compiled = postgres().compile_delete(&query).unwrap();
        assert_eq!(compiled.sql, "delete from \"users\" where \"id\" = ?");
        assert_eq!(compiled.bindings, vec![Value::Int(3)]);
    }

    #[test]
    fn write_statements_require_a_named_table() {
        let mut query = QueryModel::new();
        query.set_from_subquery(QueryModel::table("events"), "e");
        assert!(postgres().compile_delete(&query).unwrap_err().is_malformed());
        assert!(
            postgres()
                .compile_insert(&query, &[])
                .unwrap_err()
                .is_malformed()
        );
    }

    #[test]
    fn expression_select_item_splices_bindings() {
        use quarry_core::Expression;
        let mut query = QueryModel::table("users");
        query.add_column(Expression::with_bindings(
            "coalesce(score, ?) as score",
            vec![Value::Int(0)],
        ));
        query.add_where(Connector::And, Predicate::comparison("id", "=", 1));
        let compiled = postgres().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "select coalesce(score, ?) as score from \"users\" where \"id\" = ?"
        );
        assert_eq!(compiled.bindings, vec![Value::Int(0), Value::Int(1)]);
    }
}
