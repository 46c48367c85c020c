//! The query model: a dialect-agnostic description of one query.

use std::collections::BTreeSet;

use crate::clause::{Aggregate, Distinct, LockMode, OrderClause, UnionClause};
use crate::join::JoinClause;
use crate::predicate::{ConditionGroup, Connector, Predicate};
use quarry_core::Expression;

/// A named table reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    /// A bare table reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// A table reference with an alias.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Parse `"posts as p"` shorthand into name and alias.
impl From<&str> for TableRef {
    fn from(raw: &str) -> Self {
        match raw.split_once(" as ") {
            Some((name, alias)) => TableRef::aliased(name.trim(), alias.trim()),
            None => TableRef::new(raw.trim()),
        }
    }
}

impl From<String> for TableRef {
    fn from(raw: String) -> Self {
        TableRef::from(raw.as_str())
    }
}

/// The FROM target: a named table or a sub-query with a required alias.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Table(TableRef),
    Subquery {
        query: Box<QueryModel>,
        alias: String,
    },
}

/// One entry in the select list or group list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// A column name, possibly qualified (`t.col`) or aliased (`col as c`).
    Column(String),
    /// A raw expression, emitted verbatim.
    Expression(Expression),
    /// A scalar sub-query with an alias.
    Subquery {
        query: Box<QueryModel>,
        alias: String,
    },
}

impl From<&str> for SelectItem {
    fn from(column: &str) -> Self {
        SelectItem::Column(column.to_string())
    }
}

impl From<String> for SelectItem {
    fn from(column: String) -> Self {
        SelectItem::Column(column)
    }
}

impl From<Expression> for SelectItem {
    fn from(expr: Expression) -> Self {
        SelectItem::Expression(expr)
    }
}

/// The mutable, builder-populated representation of one query.
///
/// A model accumulates clauses through the mutation methods below and is
/// read-only during compilation. Cloning deep-copies every nested structure
/// (predicate trees, joins, unions, sub-queries): two clones never share
/// mutable state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryModel {
    from: Option<TableSource>,
    columns: Vec<SelectItem>,
    distinct: Distinct,
    joins: Vec<JoinClause>,
    wheres: ConditionGroup,
    groups: Vec<SelectItem>,
    havings: ConditionGroup,
    orders: Vec<OrderClause>,
    limit: Option<u64>,
    offset: Option<u64>,
    unions: Vec<UnionClause>,
    aggregate: Option<Aggregate>,
    lock: Option<LockMode>,
    known_aliases: BTreeSet<String>,
    known_tables: BTreeSet<String>,
}

impl QueryModel {
    /// A fresh model targeting the given table (accepts `"posts as p"`).
    pub fn table(table: impl Into<TableRef>) -> Self {
        let mut model = Self::default();
        model.set_from(table.into());
        model
    }

    /// A fresh model with no FROM target yet.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Mutation ====================

    /// Set the FROM target to a named table, registering its name and alias.
    ///
    /// Registration happens before any predicate referencing the table can be
    /// added, so prefix resolution at compile time is independent of clause
    /// order.
    pub fn set_from(&mut self, table: TableRef) {
        self.known_tables.insert(table.name.clone());
        if let Some(alias) = &table.alias {
            self.known_aliases.insert(alias.clone());
        }
        self.from = Some(TableSource::Table(table));
    }

    /// Set the FROM target to a sub-query with the given alias.
    pub fn set_from_subquery(&mut self, query: QueryModel, alias: impl Into<String>) {
        let alias = alias.into();
        self.known_aliases.insert(alias.clone());
        self.from = Some(TableSource::Subquery {
            query: Box::new(query),
            alias,
        });
    }

    /// Append a select-list entry.
    pub fn add_column(&mut self, item: impl Into<SelectItem>) {
        self.columns.push(item.into());
    }

    /// Append a scalar sub-query select with an alias.
    pub fn add_column_subquery(&mut self, query: QueryModel, alias: impl Into<String>) {
        self.columns.push(SelectItem::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        });
    }

    /// Set the distinct marker.
    pub fn set_distinct(&mut self, distinct: Distinct) {
        self.distinct = distinct;
    }

    /// Append a join, registering the joined table name and alias.
    pub fn add_join(&mut self, join: JoinClause) {
        self.known_tables.insert(join.table.name.clone());
        if let Some(alias) = &join.table.alias {
            self.known_aliases.insert(alias.clone());
        }
        self.joins.push(join);
    }

    /// Append a WHERE predicate with its connector.
    pub fn add_where(&mut self, connector: Connector, predicate: Predicate) {
        self.wheres.push(connector, predicate);
    }

    /// Append a grouping column or expression.
    pub fn add_group(&mut self, item: impl Into<SelectItem>) {
        self.groups.push(item.into());
    }

    /// Append a HAVING predicate with its connector.
    pub fn add_having(&mut self, connector: Connector, predicate: Predicate) {
        self.havings.push(connector, predicate);
    }

    /// Append an ORDER BY entry.
    pub fn add_order(&mut self, order: OrderClause) {
        self.orders.push(order);
    }

    /// Set the LIMIT.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    /// Set the OFFSET.
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    /// Append a union.
    pub fn add_union(&mut self, union: UnionClause) {
        self.unions.push(union);
    }

    /// Set the aggregate request; it wins over the column list at compile
    /// time.
    pub fn set_aggregate(&mut self, aggregate: Aggregate) {
        self.aggregate = Some(aggregate);
    }

    /// Request a row lock.
    pub fn set_lock(&mut self, lock: LockMode) {
        self.lock = Some(lock);
    }

    // ==================== Read accessors ====================

    /// The FROM target, if set.
    pub fn from(&self) -> Option<&TableSource> {
        self.from.as_ref()
    }

    /// The select list.
    pub fn columns(&self) -> &[SelectItem] {
        &self.columns
    }

    /// The distinct marker.
    pub fn distinct(&self) -> &Distinct {
        &self.distinct
    }

    /// The join list, in insertion order.
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// The root WHERE predicate tree.
    pub fn wheres(&self) -> &ConditionGroup {
        &self.wheres
    }

    /// The grouping list.
    pub fn groups(&self) -> &[SelectItem] {
        &self.groups
    }

    /// The root HAVING predicate tree.
    pub fn havings(&self) -> &ConditionGroup {
        &self.havings
    }

    /// The ordering list.
    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    /// The LIMIT, if set.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// The OFFSET, if set.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// The union list, in insertion order.
    pub fn unions(&self) -> &[UnionClause] {
        &self.unions
    }

    /// The aggregate request, if set.
    pub fn aggregate(&self) -> Option<&Aggregate> {
        self.aggregate.as_ref()
    }

    /// The lock request, if set.
    pub fn lock(&self) -> Option<LockMode> {
        self.lock
    }

    /// Whether the identifier is a registered table alias.
    pub fn is_known_alias(&self, ident: &str) -> bool {
        self.known_aliases.contains(ident)
    }

    /// Whether the identifier is a registered table name (from or join).
    pub fn is_known_table(&self, ident: &str) -> bool {
        self.known_tables.contains(ident)
    }
}
