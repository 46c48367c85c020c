//! Dialect-aware SQL compilation for Quarry query models.
//!
//! `quarry-grammar` is the **compilation layer**: it turns a read-only
//! `QueryModel` into a `Compiled { sql, bindings }` pair for one of the
//! supported dialects. Compilation is a pure function — a `Grammar` holds
//! only its dialect and table prefix, never mutates the model it compiles,
//! and is safe to share across threads.
//!
//! Placeholders are `?` on every dialect; the bindings vector is collected in
//! emission order, so entry *n* always corresponds to the *n*-th placeholder
//! in the SQL text.

pub mod dialect;
pub mod grammar;
mod json;
mod mysql;
mod postgres;
mod sqlite;
mod wheres;

pub use dialect::Dialect;
pub use grammar::{Compiled, Grammar, UpsertUpdate};
