//! Three-valued boolean logic
//!
//! `Truth` models SQL's boolean with an explicit unknown state. Predicates
//! evaluate to `Truth` per row; a filter keeps a row only when the result is
//! `Truth::True`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state boolean: true, false or unknown (null)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Truth {
    True,
    False,
    #[default]
    Unknown,
}

impl Truth {
    /// Three-valued AND
    ///
    /// | A       | B       | A and B |
    /// |---------|---------|---------|
    /// | true    | true    | true    |
    /// | true    | false   | false   |
    /// | true    | unknown | unknown |
    /// | false   | *       | false   |
    /// | unknown | false   | false   |
    /// | unknown | unknown | unknown |
    pub const fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Three-valued OR: true dominates, then unknown
    pub const fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Three-valued NOT: unknown stays unknown
    pub const fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// Check if this value is exactly true
    pub const fn is_true(self) -> bool {
        matches!(self, Truth::True)
    }

    /// Check if this value is unknown
    pub const fn is_unknown(self) -> bool {
        matches!(self, Truth::Unknown)
    }

    /// Convert to an optional bool (`None` for unknown)
    pub const fn to_option(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None,
        }
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }
}

impl From<Option<bool>> for Truth {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Truth::Unknown, Truth::from)
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truth::True => write!(f, "true"),
            Truth::False => write!(f, "false"),
            Truth::Unknown => write!(f, "null"),
        }
    }
}
