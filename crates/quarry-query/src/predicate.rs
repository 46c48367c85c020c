//! The recursive predicate tree used by WHERE, HAVING, and JOIN ON clauses.

use crate::model::QueryModel;
use quarry_core::{Expression, Value};

/// Boolean connector between a predicate and its previous sibling.
///
/// A connector is purely positional: it describes how a conjunct relates to
/// the conjunct *before* it in the same group, never to its parent. The first
/// conjunct of a group ignores its stored connector when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    /// The SQL keyword for this connector.
    pub const fn as_str(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

/// The right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A value bound as a parameter.
    Value(Value),
    /// A raw SQL fragment, emitted verbatim with its sub-bindings spliced in.
    Expression(Expression),
    /// A column reference, wrapped and quoted rather than bound.
    Column(String),
    /// A sub-query, compiled recursively in parentheses.
    Subquery(Box<QueryModel>),
}

impl Operand {
    /// A bound parameter value.
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    /// A column reference for column-to-column comparison.
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    /// A raw SQL fragment.
    pub fn expression(expr: impl Into<Expression>) -> Self {
        Operand::Expression(expr.into())
    }

    /// A sub-query operand.
    pub fn subquery(query: QueryModel) -> Self {
        Operand::Subquery(Box::new(query))
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expression(expr)
    }
}

impl From<QueryModel> for Operand {
    fn from(query: QueryModel) -> Self {
        Operand::Subquery(Box::new(query))
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Value(v.into())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Value(v.into())
    }
}

/// Source of an IN predicate's candidate set.
#[derive(Debug, Clone, PartialEq)]
pub enum InSource {
    /// An explicit list of operands.
    List(Vec<Operand>),
    /// A sub-query producing the candidate set.
    Subquery(Box<QueryModel>),
}

/// Date component targeted by a date-based predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Day,
    Month,
    Year,
    Time,
}

impl DatePart {
    /// Lowercase name of this component.
    pub const fn as_str(self) -> &'static str {
        match self {
            DatePart::Date => "date",
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
            DatePart::Time => "time",
        }
    }
}

/// A single predicate node.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <operator> <value>`. The operator must be in the active
    /// dialect's whitelist at compile time.
    Comparison {
        column: String,
        operator: String,
        value: Operand,
    },

    /// `column [not] in (...)`. An empty list compiles to a constant
    /// predicate rather than invalid SQL.
    In {
        column: String,
        source: InSource,
        negated: bool,
    },

    /// `column [not] between <low> and <high>`.
    Between {
        column: String,
        low: Operand,
        high: Operand,
        negated: bool,
    },

    /// `column is [not] null`.
    Null { column: String, negated: bool },

    /// `[not] exists (<sub-query>)`.
    Exists {
        query: Box<QueryModel>,
        negated: bool,
    },

    /// Raw SQL emitted verbatim; sub-bindings spliced in position.
    Raw(Expression),

    /// A nested group, rendered parenthesized.
    Group(ConditionGroup),

    /// JSON containment test on a column (optionally with a `->` path).
    JsonContains {
        column: String,
        value: Value,
        negated: bool,
    },

    /// JSON array length comparison on a column (optionally with a `->`
    /// path).
    JsonLength {
        column: String,
        operator: String,
        value: Operand,
    },

    /// Comparison against one date component of a column.
    DateBased {
        part: DatePart,
        column: String,
        operator: String,
        value: Operand,
    },
}

impl Predicate {
    /// `column <operator> <value>`.
    pub fn comparison(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        Predicate::Comparison {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// `column in (<values>)`.
    pub fn in_list(column: impl Into<String>, values: Vec<Operand>) -> Self {
        Predicate::In {
            column: column.into(),
            source: InSource::List(values),
            negated: false,
        }
    }

    /// `column not in (<values>)`.
    pub fn not_in_list(column: impl Into<String>, values: Vec<Operand>) -> Self {
        Predicate::In {
            column: column.into(),
            source: InSource::List(values),
            negated: true,
        }
    }

    /// `column in (<sub-query>)`.
    pub fn in_subquery(column: impl Into<String>, query: QueryModel) -> Self {
        Predicate::In {
            column: column.into(),
            source: InSource::Subquery(Box::new(query)),
            negated: false,
        }
    }

    /// `column between <low> and <high>`.
    pub fn between(
        column: impl Into<String>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        Predicate::Between {
            column: column.into(),
            low: low.into(),
            high: high.into(),
            negated: false,
        }
    }

    /// `column is null`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Predicate::Null {
            column: column.into(),
            negated: false,
        }
    }

    /// `column is not null`.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::Null {
            column: column.into(),
            negated: true,
        }
    }

    /// `exists (<sub-query>)`.
    pub fn exists(query: QueryModel) -> Self {
        Predicate::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    /// `not exists (<sub-query>)`.
    pub fn not_exists(query: QueryModel) -> Self {
        Predicate::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    /// Raw SQL predicate.
    pub fn raw(expr: impl Into<Expression>) -> Self {
        Predicate::Raw(expr.into())
    }

    /// A nested parenthesized group.
    pub fn group(group: ConditionGroup) -> Self {
        Predicate::Group(group)
    }
}

/// One predicate plus its connector to the previous sibling.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunct {
    pub connector: Connector,
    pub predicate: Predicate,
}

/// An ordered group of conjuncts.
///
/// The root group of a WHERE or HAVING clause renders bare; nested groups
/// render parenthesized. An empty group renders as nothing at all — no
/// parentheses and no connector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    conjuncts: Vec<Conjunct>,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate with its connector.
    pub fn push(&mut self, connector: Connector, predicate: Predicate) {
        self.conjuncts.push(Conjunct {
            connector,
            predicate,
        });
    }

    /// Append with AND, builder-style.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.push(Connector::And, predicate);
        self
    }

    /// Append with OR, builder-style.
    pub fn or(mut self, predicate: Predicate) -> Self {
        self.push(Connector::Or, predicate);
        self
    }

    /// Whether the group has no conjuncts.
    pub fn is_empty(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// Number of conjuncts in the group.
    pub fn len(&self) -> usize {
        self.conjuncts.len()
    }

    /// Iterate the conjuncts in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Conjunct> {
        self.conjuncts.iter()
    }
}

impl<'a> IntoIterator for &'a ConditionGroup {
    type Item = &'a Conjunct;
    type IntoIter = std::slice::Iter<'a, Conjunct>;

    fn into_iter(self) -> Self::IntoIter {
        self.conjuncts.iter()
    }
}
