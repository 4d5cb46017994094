//! Leaderboard recalculation and points-attribution engine.
//!
//! Four independently-ranked leaderboards are derived from the append-only
//! contribution ledger: validator, builder, validator-waitlist and
//! validator-waitlist-graduation. Membership, points aggregation and
//! ranking order are defined once in the configuration registry; the
//! incremental per-write path and the full batch rebuild both evaluate that
//! registry over the same in-memory views, so they agree bit-for-bit.

pub mod config;
pub mod engine;
pub mod error;
pub mod queries;
pub mod rank;
pub mod referral;
pub mod view;

pub use config::{spec_for, KindPoints, KindSpec, RankOrder, REGISTRY};
pub use engine::{LeaderboardEngine, RecalculationSummary};
pub use error::LeaderboardError;
pub use queries::{entry_for, program_stats, top_entries, user_stats, ProgramStats, UserStats};
