//! Daily uptime generation.
//!
//! Every participant who has at least one uptime contribution receives one
//! per UTC day, from their first uptime date through today. The generator
//! only ever fills days that have no row yet, so it cannot create
//! duplicates. Rows are frozen here and bulk-inserted without per-row
//! leaderboard triggers; callers refresh the affected users afterwards.

use std::collections::BTreeSet;

use tally_store::{ContributionStore, NewContribution, TallyStore, UserStore};
use tally_types::{freeze_points, slug, ProgramParams, Timestamp, UserId};

use crate::multipliers::MultiplierHistory;
use crate::recorder::ContributionRecorder;
use crate::LedgerError;

/// Options for one generation run.
#[derive(Clone, Debug, Default)]
pub struct UptimeOptions {
    /// Raw points per generated row; defaults to the program parameter.
    pub points: Option<u64>,
    /// Freeze at the fallback 1.0× for days with no active multiplier
    /// instead of skipping them.
    pub force: bool,
}

/// Result counts of one generation run.
#[derive(Clone, Debug, Default)]
pub struct UptimeSummary {
    pub users_scanned: u64,
    pub users_with_uptime: u64,
    pub created: u64,
    /// Days skipped because no multiplier covered them (without `force`).
    pub skipped_missing_multiplier: u64,
    /// Users that received at least one new row; callers must refresh
    /// these users' leaderboard entries.
    pub affected_users: Vec<UserId>,
}

/// Generates the daily uptime contributions.
pub struct UptimeGenerator<'a, S> {
    store: &'a S,
    params: ProgramParams,
}

impl<'a, S: TallyStore> UptimeGenerator<'a, S> {
    pub fn new(store: &'a S, params: ProgramParams) -> Self {
        Self { store, params }
    }

    /// Fill missing daily uptime rows for every user, up to and including
    /// the day of `today`.
    pub fn generate(&self, today: Timestamp, opts: UptimeOptions) -> Result<UptimeSummary, LedgerError> {
        let points = opts.points.unwrap_or(self.params.daily_uptime_points);
        let history = MultiplierHistory::new(self.store);
        let recorder = ContributionRecorder::new(self.store, self.params.clone());
        let mut summary = UptimeSummary::default();

        for user in self.store.iter_users()? {
            summary.users_scanned += 1;

            let uptime_days: BTreeSet<u64> = self
                .store
                .contributions_for(user.id)?
                .iter()
                .filter(|c| c.type_slug == slug::UPTIME)
                .map(|c| c.contribution_date.day())
                .collect();
            let Some(&first_day) = uptime_days.iter().next() else {
                continue;
            };
            summary.users_with_uptime += 1;

            let mut rows = Vec::new();
            for day in first_day..=today.day() {
                if uptime_days.contains(&day) {
                    continue;
                }
                let date = Timestamp::from_day(day);
                let multiplier_bps = match history.get_active(slug::UPTIME, date) {
                    Ok((_, bps)) => bps,
                    Err(LedgerError::NoActiveMultiplier { .. }) if opts.force => {
                        tracing::warn!(
                            user = %user.id,
                            date = %date,
                            "no multiplier for uptime day; freezing at fallback 1.0x (forced)"
                        );
                        self.params.fallback_multiplier_bps
                    }
                    Err(LedgerError::NoActiveMultiplier { .. }) => {
                        summary.skipped_missing_multiplier += 1;
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                rows.push(NewContribution {
                    user: user.id,
                    type_slug: slug::UPTIME.to_string(),
                    points,
                    multiplier_bps,
                    frozen_global_points: freeze_points(points, multiplier_bps),
                    contribution_date: date,
                    notes: format!("auto-generated daily uptime for day {day}"),
                });
            }

            if !rows.is_empty() {
                summary.created += rows.len() as u64;
                recorder.record_prefrozen(rows)?;
                summary.affected_users.push(user.id);
            }
        }

        tracing::info!(
            users = summary.users_scanned,
            with_uptime = summary.users_with_uptime,
            created = summary.created,
            skipped = summary.skipped_missing_multiplier,
            "daily uptime generation complete"
        );
        Ok(summary)
    }
}
