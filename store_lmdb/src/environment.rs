//! LMDB environment setup and key encodings.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use tally_types::{LeaderboardKind, Timestamp, UserId};

use crate::LmdbError;

/// Default map size: 1 GiB, plenty for a testnet program's ledger.
const DEFAULT_MAP_SIZE: usize = 1 << 30;

const MAX_DBS: u32 = 7;

/// All storage traits behind one LMDB environment.
///
/// One database per record family; keys are fixed-layout byte strings so
/// related rows sort together, values are bincode.
pub struct LmdbStore {
    pub(crate) env: Env,
    pub(crate) users: Database<Bytes, Bytes>,
    pub(crate) types: Database<Bytes, Bytes>,
    pub(crate) multipliers: Database<Bytes, Bytes>,
    pub(crate) contributions: Database<Bytes, Bytes>,
    pub(crate) entries: Database<Bytes, Bytes>,
    pub(crate) referrals: Database<Bytes, Bytes>,
    pub(crate) meta: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create the environment at `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| {
            LmdbError::Heed(heed::Error::Io(e))
        })?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let users = env.create_database(&mut wtxn, Some("users"))?;
        let types = env.create_database(&mut wtxn, Some("contribution_types"))?;
        let multipliers = env.create_database(&mut wtxn, Some("multipliers"))?;
        let contributions = env.create_database(&mut wtxn, Some("contributions"))?;
        let entries = env.create_database(&mut wtxn, Some("leaderboard_entries"))?;
        let referrals = env.create_database(&mut wtxn, Some("referral_points"))?;
        let meta = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "LMDB environment opened");
        Ok(Self {
            env,
            users,
            types,
            multipliers,
            contributions,
            entries,
            referrals,
            meta,
        })
    }
}

// ── key encodings ────────────────────────────────────────────────────────

pub(crate) fn user_key(user: UserId) -> [u8; 8] {
    user.raw().to_be_bytes()
}

/// Multiplier keys sort by (slug, valid_from) so one type's history is a
/// contiguous, ascending range.
pub(crate) fn multiplier_key(type_slug: &str, valid_from: Timestamp) -> Vec<u8> {
    let mut key = Vec::with_capacity(type_slug.len() + 9);
    key.extend_from_slice(type_slug.as_bytes());
    key.push(0);
    key.extend_from_slice(&valid_from.as_secs().to_be_bytes());
    key
}

pub(crate) fn multiplier_prefix(type_slug: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(type_slug.len() + 1);
    key.extend_from_slice(type_slug.as_bytes());
    key.push(0);
    key
}

/// Entry keys group one user's entries under a common prefix.
pub(crate) fn entry_key(user: UserId, kind: LeaderboardKind) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + kind.as_str().len());
    key.extend_from_slice(&user.raw().to_be_bytes());
    key.push(0);
    key.extend_from_slice(kind.as_str().as_bytes());
    key
}

pub(crate) fn entry_prefix(user: UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.extend_from_slice(&user.raw().to_be_bytes());
    key.push(0);
    key
}

pub(crate) const NEXT_CONTRIBUTION_ID_KEY: &[u8] = b"next_contribution_id";
