//! In-memory view of a user's ledger slice.
//!
//! Both recalculation paths evaluate membership predicates and points
//! calculators over the same `UserView`, built either from targeted store
//! reads (incremental) or from one full ledger scan (batch). Sharing the
//! substrate is what keeps the two paths bit-identical.

use std::collections::HashMap;

use tally_store::{ContributionStore, ContributionTypeStore, StoreError, UserStore};
use tally_types::{Category, ContributionId, Timestamp, UserId};

use crate::referral;

/// One contribution, reduced to what scoring needs.
#[derive(Clone, Debug)]
pub struct RowView {
    pub id: ContributionId,
    pub type_slug: String,
    pub category: Option<Category>,
    /// Frozen global points.
    pub points: u64,
    pub date: Timestamp,
}

/// A user's own rows plus the rows of every user they referred.
#[derive(Clone, Debug)]
pub struct UserView {
    pub user: UserId,
    /// Own rows, sorted by date.
    pub rows: Vec<RowView>,
    /// Rows of referred users, grouped per referred user.
    pub referred_rows: Vec<(UserId, Vec<RowView>)>,
}

impl UserView {
    /// Whether the user has ever received a contribution of `slug`.
    pub fn has_marker(&self, slug: &str) -> bool {
        self.rows.iter().any(|r| r.type_slug == slug)
    }

    /// The earliest contribution date of `slug`, if any.
    pub fn earliest_marker_date(&self, slug: &str) -> Option<Timestamp> {
        self.rows
            .iter()
            .filter(|r| r.type_slug == slug)
            .map(|r| r.date)
            .min()
    }

    /// Sum of frozen points in one category, optionally restricted to rows
    /// strictly before `cutoff`.
    pub fn category_points(&self, category: Category, cutoff: Option<Timestamp>) -> u64 {
        self.rows
            .iter()
            .filter(|r| r.category == Some(category))
            .filter(|r| cutoff.map_or(true, |c| r.date < c))
            .map(|r| r.points)
            .sum()
    }

    /// Per-category countable referral base sums over this user's referred
    /// rows, optionally restricted to rows strictly before `cutoff`.
    /// Returns (builder base, validator base).
    pub fn referral_bases(&self, cutoff: Option<Timestamp>) -> (u64, u64) {
        referral::bases_over(&self.referred_rows, cutoff)
    }
}

/// Slug → category lookup, loaded once per operation.
pub fn types_map<S: ContributionTypeStore>(
    store: &S,
) -> Result<HashMap<String, Option<Category>>, StoreError> {
    Ok(store
        .iter_types()?
        .into_iter()
        .map(|t| (t.slug, t.category))
        .collect())
}

/// Load one user's rows as `RowView`s, sorted by date.
pub fn load_rows<S: ContributionStore>(
    store: &S,
    user: UserId,
    types: &HashMap<String, Option<Category>>,
) -> Result<Vec<RowView>, StoreError> {
    let mut rows: Vec<RowView> = store
        .contributions_for(user)?
        .into_iter()
        .map(|c| RowView {
            id: c.id,
            category: types.get(&c.type_slug).copied().flatten(),
            type_slug: c.type_slug,
            points: c.frozen_global_points,
            date: c.contribution_date,
        })
        .collect();
    rows.sort_by_key(|r| (r.date, r.id));
    Ok(rows)
}

/// Build the full view for one user: own rows plus referred users' rows.
pub fn build_user_view<S>(store: &S, user: UserId) -> Result<UserView, StoreError>
where
    S: ContributionStore + ContributionTypeStore + UserStore,
{
    let types = types_map(store)?;
    let rows = load_rows(store, user, &types)?;
    let mut referred_rows = Vec::new();
    for referred in store.referred_users(user)? {
        referred_rows.push((referred.id, load_rows(store, referred.id, &types)?));
    }
    Ok(UserView {
        user,
        rows,
        referred_rows,
    })
}
