//! Multiplier history lookups.
//!
//! Each contribution type carries an append-only history of (valid-from,
//! value) pairs. The value in force at a date D is the entry with the
//! greatest valid-from ≤ D. Freezing always goes through `get_active`;
//! `get_current` is for display only and never fails.

use tally_store::{MultiplierRecord, MultiplierStore};
use tally_types::{Timestamp, DEFAULT_MULTIPLIER_BPS};

use crate::LedgerError;

/// Read/append access to the multiplier history of every contribution type.
pub struct MultiplierHistory<'a, S> {
    store: &'a S,
}

impl<'a, S: MultiplierStore> MultiplierHistory<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The multiplier in force for `type_slug` at `at`.
    ///
    /// Fails if the type has no history entry covering that date —
    /// contributions cannot be frozen for periods with no defined
    /// multiplier.
    pub fn get_active(
        &self,
        type_slug: &str,
        at: Timestamp,
    ) -> Result<(MultiplierRecord, u32), LedgerError> {
        let history = self.store.multipliers_for(type_slug)?;
        // History is sorted ascending by valid_from; the last entry at or
        // before `at` wins.
        history
            .into_iter()
            .rev()
            .find(|m| m.valid_from <= at)
            .map(|m| {
                let bps = m.value_bps;
                (m, bps)
            })
            .ok_or_else(|| LedgerError::NoActiveMultiplier {
                type_slug: type_slug.to_string(),
                at,
            })
    }

    /// The most recent multiplier regardless of date, defaulting to 1.0×
    /// when the type has no history at all. Display only — freezing must
    /// use `get_active`.
    pub fn get_current(&self, type_slug: &str) -> Result<u32, LedgerError> {
        let history = self.store.multipliers_for(type_slug)?;
        Ok(history
            .last()
            .map(|m| m.value_bps)
            .unwrap_or(DEFAULT_MULTIPLIER_BPS))
    }

    /// Append a history entry. Values must be positive.
    pub fn add(&self, record: MultiplierRecord) -> Result<(), LedgerError> {
        if record.value_bps == 0 {
            return Err(LedgerError::InvalidMultiplier {
                type_slug: record.type_slug,
                value_bps: record.value_bps,
            });
        }
        tracing::info!(
            type_slug = %record.type_slug,
            value_bps = record.value_bps,
            valid_from = %record.valid_from,
            "new multiplier"
        );
        self.store.put_multiplier(&record)?;
        Ok(())
    }

    /// Repair action: remove history entries with a zero value that were
    /// written around the validation (direct imports, old migrations).
    /// Returns the number of entries removed.
    pub fn drop_invalid(&self) -> Result<u64, LedgerError> {
        let mut removed = 0;
        for m in self.store.iter_multipliers()? {
            if m.value_bps == 0 {
                tracing::warn!(
                    type_slug = %m.type_slug,
                    valid_from = %m.valid_from,
                    "removing zero-value multiplier"
                );
                self.store.delete_multiplier(&m.type_slug, m.valid_from)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
