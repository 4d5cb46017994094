//! Participant categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The program track a contribution type belongs to.
///
/// Referral credit accrues only for `Validator` and `Builder` contributions;
/// `Steward` work is tracked in the ledger but earns no referral cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Validator,
    Builder,
    Steward,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::Builder => "builder",
            Self::Steward => "steward",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "validator" => Some(Self::Validator),
            "builder" => Some(Self::Builder),
            "steward" => Some(Self::Steward),
            _ => None,
        }
    }

    /// Whether contributions in this category feed the referrer's cut.
    pub fn earns_referral(&self) -> bool {
        matches!(self, Self::Validator | Self::Builder)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
