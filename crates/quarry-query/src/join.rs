//! JOIN clause types.

use crate::model::TableRef;
use crate::predicate::ConditionGroup;

/// Kinds of SQL joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    /// The SQL keywords for this join kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner join",
            JoinKind::Left => "left join",
            JoinKind::Right => "right join",
            JoinKind::Cross => "cross join",
        }
    }
}

/// A JOIN clause: kind, target table, and the ON predicate tree.
///
/// ON conditions may reference columns of the model's `from` table or of
/// prior joins; at compile time those resolve against the model's registered
/// aliases and table names, never re-prefixed.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: ConditionGroup,
}

impl JoinClause {
    /// Create an INNER JOIN.
    pub fn inner(table: impl Into<TableRef>, on: ConditionGroup) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            on,
        }
    }

    /// Create a LEFT JOIN.
    pub fn left(table: impl Into<TableRef>, on: ConditionGroup) -> Self {
        Self {
            kind: JoinKind::Left,
            table: table.into(),
            on,
        }
    }

    /// Create a RIGHT JOIN.
    pub fn right(table: impl Into<TableRef>, on: ConditionGroup) -> Self {
        Self {
            kind: JoinKind::Right,
            table: table.into(),
            on,
        }
    }

    /// Create a CROSS JOIN (no ON condition).
    pub fn cross(table: impl Into<TableRef>) -> Self {
        Self {
            kind: JoinKind::Cross,
            table: table.into(),
            on: ConditionGroup::new(),
        }
    }
}
