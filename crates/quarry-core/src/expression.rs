//! Raw SQL expressions.

use crate::value::Value;

/// A raw SQL fragment that bypasses quoting, prefixing, and binding.
///
/// Wherever an `Expression` appears in a query model, the grammar emits its
/// text verbatim: it is never quoted as an identifier, never prefixed, and
/// never bound as a parameter. Fragments may carry their own sub-bindings,
/// which are spliced into the binding list at the position the fragment
/// appears in the emitted SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    sql: String,
    bindings: Vec<Value>,
}

impl Expression {
    /// Create a raw SQL expression with no bindings.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    /// Create a raw SQL expression carrying its own bindings.
    ///
    /// The fragment's placeholders must correspond 1:1 and in-order with
    /// `bindings`; the grammar splices them into the outer binding list
    /// without inspecting the fragment text.
    pub fn with_bindings(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    /// The raw SQL text of this fragment.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Sub-bindings carried by this fragment, in placeholder order.
    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }
}

impl From<&str> for Expression {
    fn from(sql: &str) -> Self {
        Expression::new(sql)
    }
}

impl From<String> for Expression {
    fn from(sql: String) -> Self {
        Expression::new(sql)
    }
}
