//! Quarry: fluent query construction and dialect-aware SQL compilation.
//!
//! Application code chains calls on a [`Builder`] to describe a query, then
//! hands the result to a [`Grammar`] to produce a parameterized SQL string
//! plus an ordered list of bound values for one of the supported dialects:
//!
//! ```
//! use quarry::{Builder, Dialect, Grammar};
//!
//! let grammar = Grammar::new(Dialect::Postgres);
//! let compiled = Builder::table("users")
//!     .filter("active", "=", true)
//!     .order_by_desc("created_at")
//!     .limit(10)
//!     .to_sql(&grammar)
//!     .unwrap();
//!
//! assert_eq!(
//!     compiled.sql,
//!     "select * from \"users\" where \"active\" = ? order by \"created_at\" desc limit 10"
//! );
//! ```
//!
//! The compiled pair is the entire contract: execution, connections, and
//! transactions are the caller's concern.

pub mod builder;

pub use builder::{Builder, Group};
pub use quarry_core::{Error, Expression, Result, Value};
pub use quarry_grammar::{Compiled, Dialect, Grammar, UpsertUpdate};
pub use quarry_query::{
    Aggregate, AggregateFunction, ConditionGroup, Connector, DatePart, Distinct, InSource,
    JoinClause, JoinKind, LockMode, Operand, OrderClause, OrderDirection, Predicate, QueryModel,
    SelectItem, TableRef, TableSource, UnionClause,
};
