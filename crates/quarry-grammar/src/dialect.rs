//! Supported SQL dialects and their scalar configuration.
//!
//! Dialects form a closed set: each variant carries its divergent behavior as
//! small hook methods here, with the larger per-dialect templates (upsert,
//! truncate, JSON, date extraction) in the `mysql`, `postgres`, and `sqlite`
//! modules. The shared compilation walk lives in `grammar` and is
//! parameterized over these hooks rather than over trait objects, so the set
//! of dialects is exhaustively matchable.

use crate::{mysql, postgres, sqlite};
use quarry_query::LockMode;

/// Operators every dialect accepts.
const BASE_OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "&", "|", "^", "<<", ">>",
];

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    #[default]
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Lowercase name of the dialect, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// The identifier quote character.
    pub const fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        }
    }

    /// Whether the (lowercased) operator is in this dialect's whitelist.
    pub fn supports_operator(self, operator: &str) -> bool {
        let extras = match self {
            Dialect::MySql => mysql::OPERATOR_EXTRAS,
            Dialect::Postgres => postgres::OPERATOR_EXTRAS,
            Dialect::Sqlite => sqlite::OPERATOR_EXTRAS,
        };
        BASE_OPERATORS.contains(&operator) || extras.contains(&operator)
    }

    /// Whether the dialect has any row-lock clause at all.
    pub const fn supports_row_locks(self) -> bool {
        !matches!(self, Dialect::Sqlite)
    }

    /// The row-lock clause text; empty on dialects without lock support,
    /// which makes a lock request a silent no-op rather than an error.
    pub const fn lock_clause(self, mode: LockMode) -> &'static str {
        match (self, mode) {
            (Dialect::MySql, LockMode::ForUpdate) => "for update",
            (Dialect::MySql, LockMode::Shared) => "lock in share mode",
            (Dialect::Postgres, LockMode::ForUpdate) => "for update",
            (Dialect::Postgres, LockMode::Shared) => "for share",
            (Dialect::Sqlite, _) => "",
        }
    }

    /// Name of the random-ordering function.
    pub const fn random_function(self) -> &'static str {
        match self {
            Dialect::MySql => "rand",
            Dialect::Postgres | Dialect::Sqlite => "random",
        }
    }

    /// Whether `distinct on (...)` is available for the column-list distinct
    /// marker.
    pub const fn supports_distinct_on(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Whether a JSON containment predicate can be expressed.
    pub const fn supports_json_contains(self) -> bool {
        !matches!(self, Dialect::Sqlite)
    }

    /// The zero-row insert form for a wrapped table.
    pub fn default_values_sql(self, table: &str) -> String {
        match self {
            Dialect::MySql => format!("insert into {table} () values ()"),
            Dialect::Postgres | Dialect::Sqlite => format!("insert into {table} default values"),
        }
    }

    /// The leading keywords of an insert-or-ignore statement.
    pub const fn insert_ignore_keyword(self) -> &'static str {
        match self {
            Dialect::MySql => "insert ignore into",
            Dialect::Postgres => "insert into",
            Dialect::Sqlite => "insert or ignore into",
        }
    }

    /// The trailing clause of an insert-or-ignore statement.
    pub const fn insert_ignore_suffix(self) -> &'static str {
        match self {
            Dialect::Postgres => " on conflict do nothing",
            Dialect::MySql | Dialect::Sqlite => "",
        }
    }
}
