//! Rank assignment.
//!
//! Non-visible users keep their entries but are excluded from ranking.
//! Visible entries get dense distinct ranks 1..N: ties on the primary order
//! are broken by account age (earlier first), then display name, then user
//! id, so the outcome is fully deterministic.

use tally_store::{LeaderboardEntry, LeaderboardStore, StoreError, UserRecord, UserStore};
use tally_types::LeaderboardKind;

use crate::config::{spec_for, RankOrder};

/// Re-rank every entry of one kind. Points are not touched.
pub fn rank_kind<S>(store: &S, kind: LeaderboardKind) -> Result<(), StoreError>
where
    S: LeaderboardStore + UserStore,
{
    let users: std::collections::BTreeMap<_, _> = store
        .iter_users()?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut visible: Vec<(LeaderboardEntry, UserRecord)> = Vec::new();
    for entry in store.entries_for_kind(kind)? {
        let user = users
            .get(&entry.user)
            .ok_or_else(|| StoreError::NotFound(format!("{}", entry.user)))?
            .clone();
        if user.visible {
            visible.push((entry, user));
        } else if entry.rank.is_some() {
            let mut hidden = entry;
            hidden.rank = None;
            store.put_entry(&hidden)?;
        }
    }

    let order = spec_for(kind).order;
    visible.sort_by(|(ea, ua), (eb, ub)| {
        let primary = match order {
            RankOrder::PointsDesc => eb.total_points.cmp(&ea.total_points),
            RankOrder::GraduationDesc => eb.graduation_date.cmp(&ea.graduation_date),
        };
        primary
            .then(ua.joined_at.cmp(&ub.joined_at))
            .then(ua.name.cmp(&ub.name))
            .then(ua.id.cmp(&ub.id))
    });

    for (position, (mut entry, _)) in visible.into_iter().enumerate() {
        let rank = Some(position as u32 + 1);
        if entry.rank != rank {
            entry.rank = rank;
            store.put_entry(&entry)?;
        }
    }
    Ok(())
}
