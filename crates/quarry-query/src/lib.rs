//! Query model for the Quarry SQL compilation engine.
//!
//! `quarry-query` is the **representation layer**: the mutable,
//! incrementally-built description of one query that the dialect grammars
//! compile. It holds no compilation logic — clause structures accumulate here
//! and are read back by `quarry-grammar` in a fixed order.
//!
//! - `QueryModel`: target table, selected columns, joins, predicate trees,
//!   grouping, ordering, limits, unions, lock requests.
//! - `Predicate` / `Conjunct` / `ConditionGroup`: the recursive AND/OR
//!   predicate tree used by WHERE, HAVING, and JOIN ON clauses.
//! - `Operand`: the right-hand side of a predicate — a bound value, a raw
//!   expression, a compared column, or a sub-query.
//!
//! Models are owned values; `Clone` deep-copies the predicate tree, join list,
//! and nested sub-queries, so branching a base query into variants never
//! shares mutable structure.

pub mod clause;
pub mod join;
pub mod model;
pub mod predicate;

pub use clause::{
    Aggregate, AggregateFunction, Distinct, LockMode, OrderClause, OrderDirection, UnionClause,
};
pub use join::{JoinClause, JoinKind};
pub use model::{QueryModel, SelectItem, TableRef, TableSource};
pub use predicate::{ConditionGroup, Conjunct, Connector, DatePart, InSource, Operand, Predicate};
