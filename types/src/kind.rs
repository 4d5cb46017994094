//! Leaderboard kinds — the four independently-ranked boards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four independently-ranked leaderboards.
///
/// Membership, points aggregation and ranking order differ per kind; the
/// full definitions live in the leaderboard crate's configuration registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeaderboardKind {
    Validator,
    Builder,
    ValidatorWaitlist,
    ValidatorWaitlistGraduation,
}

impl LeaderboardKind {
    /// All kinds, in registry order.
    pub const ALL: [Self; 4] = [
        Self::Validator,
        Self::Builder,
        Self::ValidatorWaitlist,
        Self::ValidatorWaitlistGraduation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::Builder => "builder",
            Self::ValidatorWaitlist => "validator-waitlist",
            Self::ValidatorWaitlistGraduation => "validator-waitlist-graduation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "validator" => Some(Self::Validator),
            "builder" => Some(Self::Builder),
            "validator-waitlist" => Some(Self::ValidatorWaitlist),
            "validator-waitlist-graduation" => Some(Self::ValidatorWaitlistGraduation),
            _ => None,
        }
    }

    /// Whether entries of this kind freeze their points and date at creation.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::ValidatorWaitlistGraduation)
    }
}

impl fmt::Display for LeaderboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
