// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Three-valued (Kleene) logic.
//!
//! Used wherever a comparison may lack the information for a strict answer,
//! e.g. two subtrees whose value ranges interleave are neither before nor
//! after one another.

use std::ops::Not;

/// True, False, or Unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kleenean {
    True,
    False,
    Unknown,
}

impl Kleenean {
    /// Strong Kleene conjunction: False dominates, then Unknown.
    pub fn and(self, other: Kleenean) -> Kleenean {
        return match (self, other) {
            (Kleenean::False, _) | (_, Kleenean::False) => Kleenean::False,
            (Kleenean::True, Kleenean::True) => Kleenean::True,
            _ => Kleenean::Unknown,
        };
    }

    /// Strong Kleene disjunction: True dominates, then Unknown.
    pub fn or(self, other: Kleenean) -> Kleenean {
        return match (self, other) {
            (Kleenean::True, _) | (_, Kleenean::True) => Kleenean::True,
            (Kleenean::False, Kleenean::False) => Kleenean::False,
            _ => Kleenean::Unknown,
        };
    }

    pub fn is_true(self) -> bool {
        return self == Kleenean::True;
    }

    pub fn is_false(self) -> bool {
        return self == Kleenean::False;
    }

    pub fn is_unknown(self) -> bool {
        return self == Kleenean::Unknown;
    }
}

impl Not for Kleenean {
    type Output = Kleenean;

    fn not(self) -> Kleenean {
        return match self {
            Kleenean::True => Kleenean::False,
            Kleenean::False => Kleenean::True,
            Kleenean::Unknown => Kleenean::Unknown,
        };
    }
}

impl From<bool> for Kleenean {
    fn from(value: bool) -> Kleenean {
        return if value { Kleenean::True } else { Kleenean::False };
    }
}

impl From<Option<bool>> for Kleenean {
    fn from(value: Option<bool>) -> Kleenean {
        return match value {
            Some(b) => Kleenean::from(b),
            None => Kleenean::Unknown,
        };
    }
}

impl From<Kleenean> for Option<bool> {
    fn from(value: Kleenean) -> Option<bool> {
        return match value {
            Kleenean::True => Some(true),
            Kleenean::False => Some(false),
            Kleenean::Unknown => None,
        };
    }
}
