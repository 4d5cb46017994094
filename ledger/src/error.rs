use tally_store::StoreError;
use tally_types::{Timestamp, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no active multiplier for contribution type '{type_slug}' at {at}")]
    NoActiveMultiplier { type_slug: String, at: Timestamp },

    #[error("multiplier for '{type_slug}' must be positive, got {value_bps} bps")]
    InvalidMultiplier { type_slug: String, value_bps: u32 },

    #[error(
        "points for '{type_slug}' must be between {min} and {max}, got {points}"
    )]
    PointsOutOfRange {
        type_slug: String,
        points: u64,
        min: u64,
        max: u64,
    },

    #[error("contribution for {user} of type '{type_slug}' at {date} already recorded")]
    DuplicateContribution {
        user: UserId,
        type_slug: String,
        date: Timestamp,
    },

    #[error("unknown contribution type '{0}'")]
    UnknownType(String),

    #[error("unknown user {0}")]
    UnknownUser(UserId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
