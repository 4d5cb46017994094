//! Contribution ledger write path and multiplier history.
//!
//! The ledger is the program's source of truth: an append-only record of
//! timestamped, typed contributions whose point values are frozen at
//! creation against the multiplier then in force. Everything derived
//! (leaderboards, referral totals) is rebuilt from here.

pub mod error;
pub mod ledger;
pub mod multipliers;
pub mod recorder;
pub mod uptime;

pub use error::LedgerError;
pub use ledger::{Ledger, LedgerSummary};
pub use multipliers::MultiplierHistory;
pub use recorder::{ContributionRecorder, RecordOptions, RefreezeSummary};
pub use uptime::{UptimeGenerator, UptimeOptions, UptimeSummary};
