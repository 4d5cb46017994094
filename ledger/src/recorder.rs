//! Contribution write path.
//!
//! `record` is the single user-facing entry point: it validates, freezes the
//! multiplier and global points, and persists — all or nothing. The frozen
//! fields are never recomputed afterwards except by the explicit
//! administrative re-freeze, which callers must follow with a full
//! leaderboard rebuild.

use tally_store::{
    Contribution, ContributionStore, ContributionTypeStore, NewContribution, TallyStore, UserStore,
};
use tally_types::{freeze_points, ProgramParams, Timestamp, UserId};

use crate::multipliers::MultiplierHistory;
use crate::LedgerError;

/// Options for a single `record` call.
#[derive(Clone, Debug)]
pub struct RecordOptions {
    /// Contribution date; defaults to now.
    pub date: Option<Timestamp>,
    /// Freeze at the fallback 1.0× when no multiplier covers the date.
    /// Reserved for automated generators with an explicit force flag;
    /// user-facing flows must fail instead.
    pub force_default_multiplier: bool,
    /// Enforce the type's min/max raw-point bounds (user-facing paths).
    pub enforce_point_bounds: bool,
    pub notes: String,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            date: None,
            force_default_multiplier: false,
            enforce_point_bounds: true,
            notes: String::new(),
        }
    }
}

impl RecordOptions {
    /// Options with an explicit contribution date.
    pub fn at(date: Timestamp) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}

/// Result counts of an administrative re-freeze pass.
#[derive(Clone, Debug, Default)]
pub struct RefreezeSummary {
    pub scanned: u64,
    pub updated: u64,
    /// Rows left untouched because no multiplier covers their date.
    pub skipped_missing_multiplier: u64,
}

/// The ledger write path.
pub struct ContributionRecorder<'a, S> {
    store: &'a S,
    params: ProgramParams,
}

impl<'a, S: TallyStore> ContributionRecorder<'a, S> {
    pub fn new(store: &'a S, params: ProgramParams) -> Self {
        Self { store, params }
    }

    /// Validate, freeze and persist one contribution.
    ///
    /// Fails without persisting anything if the user or type is unknown,
    /// the points are out of bounds, an identical (user, type, date) row
    /// already exists, or no multiplier covers the contribution date.
    pub fn record(
        &self,
        user: UserId,
        type_slug: &str,
        points: u64,
        opts: RecordOptions,
    ) -> Result<Contribution, LedgerError> {
        let date = opts.date.unwrap_or_else(Timestamp::now);

        if !self.store.user_exists(user)? {
            return Err(LedgerError::UnknownUser(user));
        }
        let ty = self
            .store
            .get_type(type_slug)
            .map_err(|_| LedgerError::UnknownType(type_slug.to_string()))?;

        if opts.enforce_point_bounds && !ty.accepts_points(points) {
            return Err(LedgerError::PointsOutOfRange {
                type_slug: ty.slug,
                points,
                min: ty.min_points,
                max: ty.max_points,
            });
        }

        if self.store.contribution_exists(user, type_slug, date)? {
            return Err(LedgerError::DuplicateContribution {
                user,
                type_slug: type_slug.to_string(),
                date,
            });
        }

        let multiplier_bps = self.resolve_multiplier(type_slug, date, opts.force_default_multiplier)?;
        let frozen_global_points = freeze_points(points, multiplier_bps);

        let contribution = self.store.append_contribution(NewContribution {
            user,
            type_slug: type_slug.to_string(),
            points,
            multiplier_bps,
            frozen_global_points,
            contribution_date: date,
            notes: opts.notes,
        })?;

        tracing::info!(
            user = %user,
            type_slug = %type_slug,
            points,
            multiplier_bps,
            frozen = frozen_global_points,
            date = %date,
            "contribution recorded"
        );
        Ok(contribution)
    }

    /// Bulk-insert rows whose frozen fields are already computed.
    ///
    /// Used by automated generators. Skips the per-row validation and does
    /// not drive any leaderboard update — callers must refresh the affected
    /// users explicitly afterwards.
    pub fn record_prefrozen(
        &self,
        rows: Vec<NewContribution>,
    ) -> Result<Vec<Contribution>, LedgerError> {
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            inserted.push(self.store.append_contribution(row)?);
        }
        tracing::debug!(count = inserted.len(), "bulk contributions inserted");
        Ok(inserted)
    }

    /// Administrative batch fix: rewrite every contribution's frozen fields
    /// from the current multiplier history.
    ///
    /// This is the one operation allowed to break the freeze invariant.
    /// Rows whose type and date no longer resolve to a multiplier are left
    /// untouched and counted. Callers must run a full leaderboard rebuild
    /// afterwards.
    pub fn refreeze_all(&self) -> Result<RefreezeSummary, LedgerError> {
        let history = MultiplierHistory::new(self.store);
        let mut summary = RefreezeSummary::default();

        for mut contribution in self.store.iter_contributions()? {
            summary.scanned += 1;
            let (_, bps) = match history.get_active(&contribution.type_slug, contribution.contribution_date)
            {
                Ok(found) => found,
                Err(LedgerError::NoActiveMultiplier { .. }) => {
                    tracing::warn!(
                        id = %contribution.id,
                        type_slug = %contribution.type_slug,
                        date = %contribution.contribution_date,
                        "no multiplier covers this row; skipping re-freeze"
                    );
                    summary.skipped_missing_multiplier += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let frozen = freeze_points(contribution.points, bps);
            if contribution.multiplier_bps != bps || contribution.frozen_global_points != frozen {
                contribution.multiplier_bps = bps;
                contribution.frozen_global_points = frozen;
                self.store.update_contribution(&contribution)?;
                summary.updated += 1;
            }
        }

        tracing::info!(
            scanned = summary.scanned,
            updated = summary.updated,
            skipped = summary.skipped_missing_multiplier,
            "re-freeze complete"
        );
        Ok(summary)
    }

    fn resolve_multiplier(
        &self,
        type_slug: &str,
        date: Timestamp,
        force_default: bool,
    ) -> Result<u32, LedgerError> {
        let history = MultiplierHistory::new(self.store);
        match history.get_active(type_slug, date) {
            Ok((_, bps)) => Ok(bps),
            Err(LedgerError::NoActiveMultiplier { .. }) if force_default => {
                tracing::warn!(
                    type_slug = %type_slug,
                    date = %date,
                    "no active multiplier; freezing at fallback 1.0x (forced)"
                );
                Ok(self.params.fallback_multiplier_bps)
            }
            Err(e) => Err(e),
        }
    }
}
