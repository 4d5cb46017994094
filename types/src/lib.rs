//! Fundamental types for the Tally testnet program.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: participant and contribution identifiers, timestamps,
//! fixed-point multiplier arithmetic, category and leaderboard-kind enums,
//! the well-known contribution-type slugs, and program parameters.

pub mod category;
pub mod id;
pub mod kind;
pub mod params;
pub mod points;
pub mod slug;
pub mod time;

pub use category::Category;
pub use id::{ContributionId, UserId};
pub use kind::LeaderboardKind;
pub use params::ProgramParams;
pub use points::{freeze_points, referral_cut, BPS_SCALE, DEFAULT_MULTIPLIER_BPS};
pub use time::Timestamp;
