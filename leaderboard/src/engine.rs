//! The recalculation engine.
//!
//! Two entry points with one shared semantics: `update_user_entries`
//! refreshes a single user after a contribution write, and
//! `recalculate_all` rebuilds every leaderboard entry and referral row from
//! the ledger in a bounded number of store scans. Both evaluate the same
//! registry over the same `UserView`s, so for any ledger state the batch
//! rebuild reproduces exactly what replaying the ledger through the
//! incremental path would have produced.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tally_ledger::{ContributionRecorder, RecordOptions};
use tally_store::{
    Contribution, ContributionStore, LeaderboardEntry, LeaderboardStore, ReferralPoints,
    ReferralStore, TallyStore, UserRecord, UserStore,
};
use tally_types::{LeaderboardKind, ProgramParams, UserId};

use crate::config::{spec_for, REGISTRY};
use crate::rank::rank_kind;
use crate::view::{self, RowView, UserView};
use crate::{referral, LeaderboardError};

/// Counts reported by a full rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecalculationSummary {
    /// Users appearing in the ledger.
    pub users: u64,
    /// Leaderboard kinds rebuilt (0 when the ledger is empty).
    pub leaderboards: u64,
    /// Referrers with a referral-points row.
    pub referrers: u64,
}

impl fmt::Display for RecalculationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "recalculated {} users, {} leaderboards, {} referrers",
            self.users, self.leaderboards, self.referrers
        )
    }
}

/// The engine's public surface, as consumed by the web/CLI layer.
pub struct LeaderboardEngine<'a, S> {
    store: &'a S,
    params: ProgramParams,
}

impl<'a, S: TallyStore> LeaderboardEngine<'a, S> {
    pub fn new(store: &'a S, params: ProgramParams) -> Self {
        Self { store, params }
    }

    /// Record one contribution and restore leaderboard consistency for the
    /// contributor (and, if referred, the referrer's waitlist entry).
    ///
    /// This is the normal write path; validation failures leave no row
    /// behind and no derived state is touched.
    pub fn record_contribution(
        &self,
        user: UserId,
        type_slug: &str,
        points: u64,
        opts: RecordOptions,
    ) -> Result<Contribution, LeaderboardError> {
        let recorder = ContributionRecorder::new(self.store, self.params.clone());
        let contribution = recorder.record(user, type_slug, points, opts)?;

        let record = self.store.get_user(user)?;
        if let Some(referrer) = record.referred_by {
            let touched = referral::apply_referred_contribution(self.store, referrer, &contribution)?;
            if touched {
                self.refresh_referrer_waitlist(referrer)?;
            }
        }
        self.update_user_entries(user)?;
        Ok(contribution)
    }

    /// Incremental path: re-evaluate all four kinds for one user and
    /// re-rank every kind whose membership or points changed.
    pub fn update_user_entries(&self, user: UserId) -> Result<(), LeaderboardError> {
        let affected = self.update_entries_unranked(user)?;
        for kind in affected {
            rank_kind(self.store, kind)?;
        }
        Ok(())
    }

    /// Refresh several users (after a bulk insert), ranking each affected
    /// kind once at the end instead of once per user.
    ///
    /// A failure on one user does not abort the rest; the failed user is
    /// logged and skipped, and a later recalculation self-heals.
    pub fn refresh_users(&self, users: &[UserId]) -> Result<(), LeaderboardError> {
        let mut affected = BTreeSet::new();
        let mut seen = BTreeSet::new();
        for user in users {
            if !seen.insert(*user) {
                continue;
            }
            match self.update_entries_unranked(*user) {
                Ok(kinds) => affected.extend(kinds),
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "skipping user during bulk refresh");
                }
            }
        }
        for kind in affected {
            rank_kind(self.store, kind)?;
        }
        Ok(())
    }

    /// Re-run ranking for every kind without touching points. Repair action
    /// for use after scripts that edit frozen fields directly.
    pub fn rank_all_kinds(&self) -> Result<(), LeaderboardError> {
        for kind in LeaderboardKind::ALL {
            rank_kind(self.store, kind)?;
        }
        Ok(())
    }

    /// Batch path: rebuild all leaderboard entries and referral rows from
    /// the ledger using a bounded number of store scans, producing results
    /// identical to replaying the ledger through the incremental path in
    /// timestamp order.
    pub fn recalculate_all(&self) -> Result<RecalculationSummary, LeaderboardError> {
        self.store.clear_entries()?;
        self.store.clear_referrals()?;

        let contributions = self.store.iter_contributions()?;
        if contributions.is_empty() {
            tracing::info!("ledger is empty; nothing to recalculate");
            return Ok(RecalculationSummary {
                users: 0,
                leaderboards: 0,
                referrers: 0,
            });
        }
        let types = view::types_map(self.store)?;
        let users: BTreeMap<UserId, UserRecord> = self
            .store
            .iter_users()?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // Group the whole ledger by user, in memory.
        let mut rows_by_user: BTreeMap<UserId, Vec<RowView>> = BTreeMap::new();
        for c in contributions {
            if !users.contains_key(&c.user) {
                tracing::warn!(user = %c.user, id = %c.id, "ledger row for unknown user; skipping");
                continue;
            }
            rows_by_user.entry(c.user).or_default().push(RowView {
                id: c.id,
                category: types.get(&c.type_slug).copied().flatten(),
                type_slug: c.type_slug,
                points: c.frozen_global_points,
                date: c.contribution_date,
            });
        }
        for rows in rows_by_user.values_mut() {
            rows.sort_by_key(|r| (r.date, r.id));
        }

        // Attribute each user's rows to their referrer.
        let mut referred_by_referrer: BTreeMap<UserId, Vec<(UserId, Vec<RowView>)>> =
            BTreeMap::new();
        for (id, user) in &users {
            if let Some(referrer) = user.referred_by {
                let rows = rows_by_user.get(id).cloned().unwrap_or_default();
                referred_by_referrer
                    .entry(referrer)
                    .or_default()
                    .push((*id, rows));
            }
        }

        // Referral rows: one per referrer with referred work in an
        // eligible category, bases summed per category.
        let mut referral_rows = Vec::new();
        for (referrer, referred_rows) in &referred_by_referrer {
            let eligible = referred_rows.iter().any(|(_, rows)| {
                rows.iter()
                    .any(|r| r.category.map_or(false, |c| c.earns_referral()))
            });
            if !eligible {
                continue;
            }
            let (builder_base, validator_base) = referral::bases_over(referred_rows, None);
            referral_rows.push(ReferralPoints {
                user: *referrer,
                builder_base,
                validator_base,
            });
        }
        self.store.put_referrals(&referral_rows)?;

        // Evaluate the registry for every user in the ledger and
        // accumulate the entries for one bulk insert.
        let mut entries = Vec::new();
        for (id, rows) in &rows_by_user {
            let view = UserView {
                user: *id,
                rows: rows.clone(),
                referred_rows: referred_by_referrer.get(id).cloned().unwrap_or_default(),
            };
            for spec in &REGISTRY {
                if spec.qualifies(&view) {
                    let points = spec.points(&view, &self.params);
                    entries.push(LeaderboardEntry {
                        user: *id,
                        kind: spec.kind,
                        total_points: points.total,
                        rank: None,
                        graduation_date: points.graduation_date,
                    });
                }
            }
        }
        self.store.put_entries(&entries)?;

        for kind in LeaderboardKind::ALL {
            rank_kind(self.store, kind)?;
        }

        let summary = RecalculationSummary {
            users: rows_by_user.len() as u64,
            leaderboards: LeaderboardKind::ALL.len() as u64,
            referrers: referral_rows.len() as u64,
        };
        tracing::info!(%summary, "full recalculation complete");
        Ok(summary)
    }

    /// Evaluate the registry for one user and upsert/delete their entries;
    /// returns the kinds that need re-ranking.
    fn update_entries_unranked(
        &self,
        user: UserId,
    ) -> Result<BTreeSet<LeaderboardKind>, LeaderboardError> {
        let view = view::build_user_view(self.store, user)?;
        let existing: BTreeMap<LeaderboardKind, LeaderboardEntry> = self
            .store
            .entries_for_user(user)?
            .into_iter()
            .map(|e| (e.kind, e))
            .collect();

        let mut affected = BTreeSet::new();
        for spec in &REGISTRY {
            let kind = spec.kind;
            if spec.qualifies(&view) {
                affected.insert(kind);
                if kind.is_frozen() && existing.contains_key(&kind) {
                    // Graduation points are frozen for life; recomputing is
                    // a guaranteed no-op, so don't.
                    continue;
                }
                let points = spec.points(&view, &self.params);
                self.store.put_entry(&LeaderboardEntry {
                    user,
                    kind,
                    total_points: points.total,
                    rank: existing.get(&kind).and_then(|e| e.rank),
                    graduation_date: points.graduation_date,
                })?;
            } else if existing.contains_key(&kind) {
                self.store.delete_entry(user, kind)?;
                affected.insert(kind);
            }
        }
        tracing::debug!(user = %user, affected = affected.len(), "user entries updated");
        Ok(affected)
    }

    /// Waitlist points embed referral credit, so a referred contribution
    /// must refresh the referrer's waitlist entry. Only that one kind is
    /// re-ranked, keeping the per-write blast radius bounded.
    fn refresh_referrer_waitlist(&self, referrer: UserId) -> Result<(), LeaderboardError> {
        let Some(entry) = self
            .store
            .get_entry(referrer, LeaderboardKind::ValidatorWaitlist)?
        else {
            return Ok(());
        };
        let view = view::build_user_view(self.store, referrer)?;
        let spec = spec_for(LeaderboardKind::ValidatorWaitlist);
        let points = spec.points(&view, &self.params);
        if points.total != entry.total_points {
            self.store.put_entry(&LeaderboardEntry {
                total_points: points.total,
                ..entry
            })?;
            rank_kind(self.store, LeaderboardKind::ValidatorWaitlist)?;
        }
        Ok(())
    }
}
