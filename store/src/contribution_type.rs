//! Contribution-type storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::Category;

/// An action category participants earn points for (e.g. "uptime",
/// "node-running", "validator-waitlist").
///
/// Types are effectively immutable once contributions reference them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContributionType {
    /// Unique identifier, referenced by contributions and multipliers.
    pub slug: String,
    pub name: String,
    /// Program track; `None` for types outside any track (no referral cut).
    pub category: Option<Category>,
    /// Minimum raw points accepted by user-facing submission paths.
    pub min_points: u64,
    /// Maximum raw points accepted by user-facing submission paths.
    pub max_points: u64,
    /// Included by default when provisioning new validators.
    pub is_default: bool,
    /// Whether participants can submit this type themselves.
    pub is_submittable: bool,
}

impl ContributionType {
    /// Whether `points` falls within this type's configured bounds.
    pub fn accepts_points(&self, points: u64) -> bool {
        points >= self.min_points && points <= self.max_points
    }
}

/// Trait for contribution-type storage operations.
pub trait ContributionTypeStore {
    fn get_type(&self, slug: &str) -> Result<ContributionType, StoreError>;
    fn put_type(&self, ty: &ContributionType) -> Result<(), StoreError>;
    fn iter_types(&self) -> Result<Vec<ContributionType>, StoreError>;

    fn type_exists(&self, slug: &str) -> Result<bool, StoreError> {
        match self.get_type(slug) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
