//! Multiplier-history storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::Timestamp;

/// One entry in a contribution type's multiplier history.
///
/// The history is append-only: a new entry supersedes prior ones for all
/// dates on or after its `valid_from`, but contributions keep whatever
/// multiplier was frozen at their creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiplierRecord {
    pub type_slug: String,
    /// Multiplier in basis points (10000 = 1.0×). Always positive.
    pub value_bps: u32,
    /// First instant this value is in force.
    pub valid_from: Timestamp,
    /// Reason for this multiplier value.
    pub description: String,
}

/// Trait for multiplier-history storage operations.
pub trait MultiplierStore {
    fn put_multiplier(&self, record: &MultiplierRecord) -> Result<(), StoreError>;

    /// History for one type, sorted by `valid_from` ascending.
    fn multipliers_for(&self, type_slug: &str) -> Result<Vec<MultiplierRecord>, StoreError>;

    fn iter_multipliers(&self) -> Result<Vec<MultiplierRecord>, StoreError>;

    fn delete_multiplier(&self, type_slug: &str, valid_from: Timestamp) -> Result<(), StoreError>;
}
