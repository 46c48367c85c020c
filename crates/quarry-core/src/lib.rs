//! Core types for the Quarry SQL compilation engine.
//!
//! This crate provides the leaf abstractions shared by the query model and the
//! dialect grammars:
//!
//! - `Value` for dynamically-typed bound parameters
//! - `Expression` for raw SQL fragments that bypass quoting and binding
//! - identifier quoting helpers
//! - the compilation error taxonomy (`Error`, `Result`)

pub mod error;
pub mod expression;
pub mod identifiers;
pub mod value;

pub use error::{Error, Result};
pub use expression::Expression;
pub use identifiers::{quote_with, sanitize_identifier};
pub use value::Value;
