//! LMDB storage backend for the Tally testnet program.
//!
//! Implements all storage traits from `tally-store` using the `heed` LMDB
//! bindings. Each record family maps to one LMDB database within a single
//! environment; values are `bincode`-serialized.

pub mod contribution;
pub mod contribution_type;
pub mod environment;
pub mod error;
pub mod leaderboard;
pub mod multiplier;
pub mod referral;
pub mod user;

pub use environment::LmdbStore;
pub use error::LmdbError;
