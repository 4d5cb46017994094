//! Read contract for leaderboard display and program statistics.

use std::collections::BTreeMap;

use tally_store::{
    ContributionStore, ContributionTypeStore, LeaderboardEntry, LeaderboardStore, StoreError,
};
use tally_types::{LeaderboardKind, UserId};

/// A ranked page of one leaderboard.
///
/// Entries with no rank (non-visible users) never appear in top-N views;
/// fetch them via `entry_for` when showing a user their own standing.
pub fn top_entries<S: LeaderboardStore>(
    store: &S,
    kind: LeaderboardKind,
    offset: usize,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let mut ranked: Vec<LeaderboardEntry> = store
        .entries_for_kind(kind)?
        .into_iter()
        .filter(|e| e.rank.is_some())
        .collect();
    ranked.sort_by_key(|e| e.rank);
    Ok(ranked.into_iter().skip(offset).take(limit).collect())
}

/// One user's own entry, ranked or not.
pub fn entry_for<S: LeaderboardStore>(
    store: &S,
    user: UserId,
    kind: LeaderboardKind,
) -> Result<Option<LeaderboardEntry>, StoreError> {
    store.get_entry(user, kind)
}

/// Dashboard-level totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramStats {
    /// Users with at least one contribution.
    pub participant_count: u64,
    pub contribution_count: u64,
    pub total_points: u64,
}

pub fn program_stats<S: ContributionStore>(store: &S) -> Result<ProgramStats, StoreError> {
    let contributions = store.iter_contributions()?;
    let participants: std::collections::BTreeSet<UserId> =
        contributions.iter().map(|c| c.user).collect();
    Ok(ProgramStats {
        participant_count: participants.len() as u64,
        contribution_count: contributions.len() as u64,
        total_points: contributions.iter().map(|c| c.frozen_global_points).sum(),
    })
}

/// Per-type slice of one user's contributions.
#[derive(Clone, Debug)]
pub struct TypeBreakdown {
    pub type_slug: String,
    pub type_name: String,
    pub count: u64,
    pub total_points: u64,
    /// Share of the user's total points, 0..=100.
    pub percentage: f64,
}

/// One user's totals and per-type breakdown.
#[derive(Clone, Debug)]
pub struct UserStats {
    pub total_points: u64,
    pub contribution_count: u64,
    pub average_points: f64,
    /// Sorted by points, largest slice first.
    pub breakdown: Vec<TypeBreakdown>,
}

pub fn user_stats<S>(store: &S, user: UserId) -> Result<UserStats, StoreError>
where
    S: ContributionStore + ContributionTypeStore,
{
    let contributions = store.contributions_for(user)?;
    let total_points: u64 = contributions.iter().map(|c| c.frozen_global_points).sum();
    let contribution_count = contributions.len() as u64;

    let mut per_type: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for c in &contributions {
        let slot = per_type.entry(c.type_slug.clone()).or_default();
        slot.0 += 1;
        slot.1 += c.frozen_global_points;
    }

    let names: BTreeMap<String, String> = store
        .iter_types()?
        .into_iter()
        .map(|t| (t.slug, t.name))
        .collect();

    let mut breakdown: Vec<TypeBreakdown> = per_type
        .into_iter()
        .map(|(type_slug, (count, points))| TypeBreakdown {
            type_name: names.get(&type_slug).cloned().unwrap_or_else(|| type_slug.clone()),
            type_slug,
            count,
            total_points: points,
            percentage: if total_points > 0 {
                points as f64 / total_points as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    breakdown.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.type_slug.cmp(&b.type_slug)));

    Ok(UserStats {
        total_points,
        contribution_count,
        average_points: if contribution_count > 0 {
            total_points as f64 / contribution_count as f64
        } else {
            0.0
        },
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::{ContributionType, MemoryStore, NewContribution};
    use tally_types::Timestamp;

    fn append(store: &MemoryStore, user: u64, type_slug: &str, frozen: u64, date: u64) {
        store
            .append_contribution(NewContribution {
                user: UserId::new(user),
                type_slug: type_slug.into(),
                points: frozen,
                multiplier_bps: 10_000,
                frozen_global_points: frozen,
                contribution_date: Timestamp::new(date),
                notes: String::new(),
            })
            .unwrap();
    }

    #[test]
    fn top_entries_skip_unranked_and_paginate() {
        let store = MemoryStore::new();
        for (user, rank) in [(1u64, Some(2u32)), (2, Some(1)), (3, None), (4, Some(3))] {
            store
                .put_entry(&LeaderboardEntry {
                    user: UserId::new(user),
                    kind: LeaderboardKind::Builder,
                    total_points: 10,
                    rank,
                    graduation_date: None,
                })
                .unwrap();
        }

        let top = top_entries(&store, LeaderboardKind::Builder, 0, 10).unwrap();
        let order: Vec<u64> = top.iter().map(|e| e.user.raw()).collect();
        assert_eq!(order, vec![2, 1, 4]);

        let page = top_entries(&store, LeaderboardKind::Builder, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].user, UserId::new(1));

        // The unranked user is still reachable directly.
        assert!(entry_for(&store, UserId::new(3), LeaderboardKind::Builder)
            .unwrap()
            .is_some());
    }

    #[test]
    fn program_stats_count_distinct_participants() {
        let store = MemoryStore::new();
        append(&store, 1, "uptime", 2, 100);
        append(&store, 1, "uptime", 3, 200);
        append(&store, 2, "node-running", 10, 150);

        let stats = program_stats(&store).unwrap();
        assert_eq!(stats.participant_count, 2);
        assert_eq!(stats.contribution_count, 3);
        assert_eq!(stats.total_points, 15);
    }

    #[test]
    fn user_stats_break_down_by_type() {
        let store = MemoryStore::new();
        store
            .put_type(&ContributionType {
                slug: "uptime".into(),
                name: "Uptime".into(),
                category: None,
                min_points: 0,
                max_points: 10,
                is_default: false,
                is_submittable: false,
            })
            .unwrap();
        append(&store, 1, "uptime", 2, 100);
        append(&store, 1, "uptime", 2, 200);
        append(&store, 1, "node-running", 6, 150);

        let stats = user_stats(&store, UserId::new(1)).unwrap();
        assert_eq!(stats.total_points, 10);
        assert_eq!(stats.contribution_count, 3);
        assert!((stats.average_points - 10.0 / 3.0).abs() < 1e-9);

        assert_eq!(stats.breakdown.len(), 2);
        assert_eq!(stats.breakdown[0].type_slug, "node-running");
        assert_eq!(stats.breakdown[0].total_points, 6);
        assert!((stats.breakdown[0].percentage - 60.0).abs() < 1e-9);
        // Unregistered slugs fall back to the slug as display name.
        assert_eq!(stats.breakdown[0].type_name, "node-running");
        assert_eq!(stats.breakdown[1].type_name, "Uptime");
    }

    #[test]
    fn empty_user_stats_are_all_zero() {
        let store = MemoryStore::new();
        let stats = user_stats(&store, UserId::new(9)).unwrap();
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.contribution_count, 0);
        assert_eq!(stats.average_points, 0.0);
        assert!(stats.breakdown.is_empty());
    }
}
