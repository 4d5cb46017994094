//! Abstract storage traits for the Tally testnet program.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger and leaderboard crates depend only on the traits.

pub mod contribution;
pub mod contribution_type;
pub mod error;
pub mod leaderboard;
pub mod memory;
pub mod multiplier;
pub mod referral;
pub mod user;

pub use contribution::{Contribution, ContributionStore, NewContribution};
pub use contribution_type::{ContributionType, ContributionTypeStore};
pub use error::StoreError;
pub use leaderboard::{LeaderboardEntry, LeaderboardStore};
pub use memory::MemoryStore;
pub use multiplier::{MultiplierRecord, MultiplierStore};
pub use referral::{ReferralPoints, ReferralStore};
pub use user::{UserRecord, UserStore};

/// A complete backend: every record family behind one handle.
///
/// Blanket-implemented for any type that implements all six store traits,
/// so engines can take a single generic bound.
pub trait TallyStore:
    UserStore
    + ContributionTypeStore
    + MultiplierStore
    + ContributionStore
    + LeaderboardStore
    + ReferralStore
{
}

impl<T> TallyStore for T where
    T: UserStore
        + ContributionTypeStore
        + MultiplierStore
        + ContributionStore
        + LeaderboardStore
        + ReferralStore
{
}
