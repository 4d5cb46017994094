//! Referral points tracking.
//!
//! A referrer earns a cut of their referred users' frozen points, split by
//! category. Onboarding marker contributions (`builder-welcome`,
//! `validator-waitlist`) count toward the base only once the referred user
//! has some other contribution in the same category — joining alone earns
//! the referrer nothing.
//!
//! The cut itself is applied once per category to the summed base
//! (floor semantics), so the stored row keeps raw base sums and the
//! incremental path stays a plain integer add.

use tally_store::{
    Contribution, ReferralPoints, ReferralStore, StoreError, TallyStore, UserStore,
};
use tally_types::{slug, Category, Timestamp, UserId};

use crate::view::{self, RowView};

/// The onboarding marker excluded from a category's base until the referred
/// user has other work in that category.
fn onboarding_slug(category: Category) -> Option<&'static str> {
    match category {
        Category::Builder => Some(slug::BUILDER_WELCOME),
        Category::Validator => Some(slug::VALIDATOR_WAITLIST),
        Category::Steward => None,
    }
}

/// Countable base of one referred user's rows within one category.
///
/// `rows` must already be restricted to the relevant time window.
pub fn countable_base(rows: &[RowView], category: Category) -> u64 {
    if !category.earns_referral() {
        return 0;
    }
    let in_category: Vec<&RowView> = rows
        .iter()
        .filter(|r| r.category == Some(category))
        .collect();
    let onboarding = onboarding_slug(category);
    let has_other = in_category
        .iter()
        .any(|r| Some(r.type_slug.as_str()) != onboarding);
    in_category
        .iter()
        .filter(|r| has_other || Some(r.type_slug.as_str()) != onboarding)
        .map(|r| r.points)
        .sum()
}

/// Per-category base sums across a set of referred users.
/// Returns (builder base, validator base).
pub fn bases_over(
    referred_rows: &[(UserId, Vec<RowView>)],
    cutoff: Option<Timestamp>,
) -> (u64, u64) {
    let mut builder = 0;
    let mut validator = 0;
    for (_, rows) in referred_rows {
        let window: Vec<RowView> = rows
            .iter()
            .filter(|r| cutoff.map_or(true, |c| r.date < c))
            .cloned()
            .collect();
        builder += countable_base(&window, Category::Builder);
        validator += countable_base(&window, Category::Validator);
    }
    (builder, validator)
}

/// Incremental update for one newly recorded referred contribution.
///
/// Recomputes the (referred user, category) base slice with and without the
/// new row and applies the delta, which also retroactively unlocks the
/// onboarding credit when this row is the referred user's first real work
/// in the category. No-op for categories outside the referral program.
///
/// Returns `true` if the referrer's row was touched.
pub fn apply_referred_contribution<S: TallyStore>(
    store: &S,
    referrer: UserId,
    new_row: &Contribution,
) -> Result<bool, StoreError> {
    let types = view::types_map(store)?;
    let Some(category) = types.get(&new_row.type_slug).copied().flatten() else {
        return Ok(false);
    };
    if !category.earns_referral() {
        return Ok(false);
    }

    let rows = view::load_rows(store, new_row.user, &types)?;
    let with = countable_base(&rows, category);
    let without_rows: Vec<RowView> = rows.iter().filter(|r| r.id != new_row.id).cloned().collect();
    let without = countable_base(&without_rows, category);
    let delta = with - without;

    let mut record = store
        .get_referral(referrer)?
        .unwrap_or_else(|| ReferralPoints::zero(referrer));
    match category {
        Category::Builder => record.builder_base += delta,
        Category::Validator => record.validator_base += delta,
        Category::Steward => unreachable!("steward earns no referral"),
    }
    store.put_referral(&record)?;

    tracing::debug!(
        referrer = %referrer,
        referred = %new_row.user,
        category = %category,
        delta,
        "referral base updated"
    );
    Ok(true)
}

/// Zero out and rebuild a referrer's base sums from their referred users'
/// current rows. Deletes the row entirely when no referred contribution in
/// an eligible category exists.
pub fn recalculate_referrer<S: TallyStore>(
    store: &S,
    referrer: UserId,
) -> Result<(), StoreError> {
    let types = view::types_map(store)?;
    let mut referred_rows = Vec::new();
    for referred in store.referred_users(referrer)? {
        referred_rows.push((referred.id, view::load_rows(store, referred.id, &types)?));
    }
    let eligible = referred_rows.iter().any(|(_, rows)| {
        rows.iter()
            .any(|r| r.category.map_or(false, |c| c.earns_referral()))
    });
    if !eligible {
        store.delete_referral(referrer)?;
        return Ok(());
    }
    let (builder_base, validator_base) = bases_over(&referred_rows, None);
    store.put_referral(&ReferralPoints {
        user: referrer,
        builder_base,
        validator_base,
    })?;
    Ok(())
}

/// Administrative rebuild of every referrer's totals from scratch.
/// Returns the number of referrers processed.
pub fn recalculate_all_referrers<S: TallyStore>(store: &S) -> Result<u64, StoreError> {
    let referrers: Vec<UserId> = store
        .iter_users()?
        .into_iter()
        .filter_map(|u| u.referred_by)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    store.clear_referrals()?;
    let mut processed = 0;
    for referrer in &referrers {
        recalculate_referrer(store, *referrer)?;
        processed += 1;
    }
    tracing::info!(referrers = processed, "referral points rebuilt");
    Ok(processed)
}
