//! End-to-end engine scenarios: membership, points, graduation freezing,
//! referral credit, ranking and the incremental/batch agreement.

use tally_ledger::{LedgerError, RecordOptions, UptimeGenerator, UptimeOptions};
use tally_leaderboard::{
    entry_for, top_entries, LeaderboardEngine, LeaderboardError, RecalculationSummary,
};
use tally_store::{
    ContributionType, ContributionTypeStore, LeaderboardStore, MemoryStore, MultiplierRecord,
    MultiplierStore, ReferralStore, UserRecord, UserStore,
};
use tally_types::{slug, Category, LeaderboardKind, ProgramParams, Timestamp, UserId};

fn seed_store() -> MemoryStore {
    let store = MemoryStore::new();
    let types: [(&str, Option<Category>, u32); 7] = [
        (slug::VALIDATOR_WAITLIST, Some(Category::Validator), 10_000),
        (slug::VALIDATOR, Some(Category::Validator), 10_000),
        ("node-running", Some(Category::Validator), 20_000),
        (slug::UPTIME, Some(Category::Validator), 10_000),
        (slug::BUILDER_WELCOME, Some(Category::Builder), 10_000),
        ("code-contribution", Some(Category::Builder), 15_000),
        ("moderation", Some(Category::Steward), 10_000),
    ];
    for (type_slug, category, bps) in types {
        store
            .put_type(&ContributionType {
                slug: type_slug.into(),
                name: type_slug.into(),
                category,
                min_points: 1,
                max_points: 1_000,
                is_default: false,
                is_submittable: true,
            })
            .unwrap();
        store
            .put_multiplier(&MultiplierRecord {
                type_slug: type_slug.into(),
                value_bps: bps,
                valid_from: Timestamp::EPOCH,
                description: String::new(),
            })
            .unwrap();
    }
    store
}

fn add_user(store: &MemoryStore, id: u64, name: &str, joined: u64, referred_by: Option<u64>) {
    store
        .put_user(&UserRecord {
            id: UserId::new(id),
            name: name.into(),
            visible: true,
            joined_at: Timestamp::new(joined),
            referred_by: referred_by.map(UserId::new),
        })
        .unwrap();
}

fn engine(store: &MemoryStore) -> LeaderboardEngine<'_, MemoryStore> {
    LeaderboardEngine::new(store, ProgramParams::testnet_defaults())
}

fn record(store: &MemoryStore, user: u64, type_slug: &str, points: u64, date: u64) {
    engine(store)
        .record_contribution(UserId::new(user), type_slug, points, RecordOptions::at(Timestamp::new(date)))
        .unwrap();
}

fn entry(store: &MemoryStore, user: u64, kind: LeaderboardKind) -> Option<(u64, Option<u32>, Option<Timestamp>)> {
    entry_for(store, UserId::new(user), kind)
        .unwrap()
        .map(|e| (e.total_points, e.rank, e.graduation_date))
}

#[test]
fn builder_welcome_alone_confers_no_membership_but_counts_once_qualified() {
    let store = seed_store();
    add_user(&store, 1, "builder", 0, None);

    record(&store, 1, slug::BUILDER_WELCOME, 20, 100);
    assert_eq!(entry(&store, 1, LeaderboardKind::Builder), None);

    record(&store, 1, "code-contribution", 10, 200);
    // welcome 20×1.0 + code 10×1.5 = 35, including the welcome points.
    assert_eq!(entry(&store, 1, LeaderboardKind::Builder), Some((35, Some(1), None)));
}

#[test]
fn validator_points_include_the_waitlist_era() {
    let store = seed_store();
    add_user(&store, 1, "validator", 0, None);

    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 1_000);
    record(&store, 1, "node-running", 50, 2_000);
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), Some((120, Some(1), None)));
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator), None);

    record(&store, 1, slug::VALIDATOR, 1, 3_000);
    record(&store, 1, "node-running", 100, 4_000);

    // 20 + 100 + 1 + 200: waitlist-era work still counts after graduating.
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator), Some((321, Some(1), None)));
    // Graduating removes the waitlist entry.
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), None);
}

#[test]
fn graduation_snapshot_is_frozen_for_life() {
    let store = seed_store();
    add_user(&store, 1, "graduate", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));

    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 1_000);
    record(&store, 2, "node-running", 100, 2_000); // 200 frozen for the referrer's credit
    record(&store, 1, "node-running", 50, 3_000); // 100 frozen
    record(&store, 1, slug::VALIDATOR, 1, 5_000);

    // 20 + 100 own before graduation + floor(200 × 10%) referral = 140;
    // the graduation marker itself is not strictly before itself.
    let frozen = entry(&store, 1, LeaderboardKind::ValidatorWaitlistGraduation).unwrap();
    assert_eq!(frozen, (140, Some(1), Some(Timestamp::new(5_000))));

    // Contributions after graduation change nothing on the snapshot.
    record(&store, 1, "node-running", 100, 6_000);
    record(&store, 2, "node-running", 100, 7_000);
    assert_eq!(
        entry(&store, 1, LeaderboardKind::ValidatorWaitlistGraduation).unwrap(),
        frozen
    );

    // Neither does a full rebuild, run twice.
    let e = engine(&store);
    e.recalculate_all().unwrap();
    assert_eq!(
        entry(&store, 1, LeaderboardKind::ValidatorWaitlistGraduation).unwrap(),
        frozen
    );
    e.recalculate_all().unwrap();
    assert_eq!(
        entry(&store, 1, LeaderboardKind::ValidatorWaitlistGraduation).unwrap(),
        frozen
    );
}

#[test]
fn waitlist_points_fold_in_referral_credit() {
    let store = seed_store();
    add_user(&store, 1, "waitlisted", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));

    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 1_000);
    record(&store, 2, "node-running", 100, 2_000);

    // 20 own + floor(200 × 10%) = 40.
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), Some((40, Some(1), None)));

    let rp = store.get_referral(UserId::new(1)).unwrap().unwrap();
    assert_eq!(rp.validator_base, 200);
    assert_eq!(rp.validator_points(1_000), 20);
    assert_eq!(rp.builder_base, 0);
}

#[test]
fn referral_credit_for_onboarding_unlocks_retroactively() {
    let store = seed_store();
    add_user(&store, 1, "referrer", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));

    // The welcome action alone earns the referrer nothing...
    record(&store, 2, slug::BUILDER_WELCOME, 20, 1_000);
    let rp = store.get_referral(UserId::new(1)).unwrap().unwrap();
    assert_eq!(rp.builder_base, 0);

    // ...until real builder work arrives, which unlocks it too.
    record(&store, 2, "code-contribution", 10, 2_000);
    let rp = store.get_referral(UserId::new(1)).unwrap().unwrap();
    assert_eq!(rp.builder_base, 35); // 20 + 15
    assert_eq!(rp.builder_points(1_000), 3);
}

#[test]
fn steward_contributions_earn_no_referral_credit() {
    let store = seed_store();
    add_user(&store, 1, "referrer", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));

    record(&store, 2, "moderation", 50, 1_000);
    assert!(store.get_referral(UserId::new(1)).unwrap().is_none());
}

#[test]
fn ties_rank_by_account_age() {
    let store = seed_store();
    add_user(&store, 1, "newer", 5_000, None);
    add_user(&store, 2, "older", 1_000, None);

    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 10_000);
    record(&store, 2, slug::VALIDATOR_WAITLIST, 20, 10_001);

    assert_eq!(entry(&store, 2, LeaderboardKind::ValidatorWaitlist), Some((20, Some(1), None)));
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), Some((20, Some(2), None)));
}

#[test]
fn non_visible_users_keep_entries_but_never_rank() {
    let store = seed_store();
    add_user(&store, 1, "seen", 0, None);
    store
        .put_user(&UserRecord {
            id: UserId::new(2),
            name: "ghost".into(),
            visible: false,
            joined_at: Timestamp::EPOCH,
            referred_by: None,
        })
        .unwrap();

    record(&store, 1, slug::VALIDATOR_WAITLIST, 10, 1_000);
    record(&store, 2, slug::VALIDATOR_WAITLIST, 99, 1_001);

    assert_eq!(entry(&store, 2, LeaderboardKind::ValidatorWaitlist), Some((99, None, None)));
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), Some((10, Some(1), None)));

    // Top-N views skip the unranked entry entirely.
    let top = top_entries(&store, LeaderboardKind::ValidatorWaitlist, 0, 10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].user, UserId::new(1));
}

#[test]
fn recalculate_all_on_empty_ledger_reports_zeros() {
    let store = seed_store();
    let summary = engine(&store).recalculate_all().unwrap();
    assert_eq!(
        summary,
        RecalculationSummary {
            users: 0,
            leaderboards: 0,
            referrers: 0,
        }
    );
    assert!(store.entries_for_kind(LeaderboardKind::Validator).unwrap().is_empty());
}

#[test]
fn recalculate_all_reports_counts_and_is_idempotent() {
    let store = seed_store();
    add_user(&store, 1, "referrer", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));
    add_user(&store, 3, "builder", 0, None);

    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 1_000);
    record(&store, 2, "node-running", 100, 2_000);
    record(&store, 3, "code-contribution", 10, 3_000);

    let e = engine(&store);
    let first = e.recalculate_all().unwrap();
    assert_eq!(first.users, 3);
    assert_eq!(first.leaderboards, 4);
    assert_eq!(first.referrers, 1);
    assert_eq!(
        format!("{first}"),
        "recalculated 3 users, 4 leaderboards, 1 referrers"
    );

    let snapshot = dump_tables(&store);
    let second = e.recalculate_all().unwrap();
    assert_eq!(first, second);
    assert_eq!(snapshot, dump_tables(&store));
}

#[test]
fn batch_rebuild_matches_incremental_state() {
    let store = seed_store();
    add_user(&store, 1, "referrer", 100, None);
    add_user(&store, 2, "referred-one", 200, Some(1));
    add_user(&store, 3, "referred-two", 300, Some(1));
    add_user(&store, 4, "regular", 400, None);

    // Referrer: waitlist, work, graduation, post-graduation work.
    record(&store, 1, slug::VALIDATOR_WAITLIST, 20, 1_000);
    record(&store, 1, "node-running", 50, 2_000);
    // Referred users: builder and validator work either side of graduation.
    record(&store, 2, slug::BUILDER_WELCOME, 20, 2_500);
    record(&store, 2, "code-contribution", 30, 3_000);
    record(&store, 2, slug::VALIDATOR_WAITLIST, 20, 3_500);
    record(&store, 2, "node-running", 60, 4_000);
    record(&store, 3, slug::VALIDATOR_WAITLIST, 20, 4_500);
    record(&store, 3, "node-running", 80, 5_000);
    record(&store, 1, slug::VALIDATOR, 1, 6_000);
    record(&store, 1, "node-running", 75, 7_000);
    record(&store, 2, "node-running", 40, 8_000);
    record(&store, 4, slug::VALIDATOR_WAITLIST, 20, 8_500);
    record(&store, 4, "code-contribution", 25, 9_000);

    let incremental = dump_tables(&store);
    engine(&store).recalculate_all().unwrap();
    assert_eq!(incremental, dump_tables(&store));
}

#[test]
fn rank_all_kinds_resynchronizes_after_direct_edits() {
    let store = seed_store();
    add_user(&store, 1, "one", 0, None);
    add_user(&store, 2, "two", 0, None);
    record(&store, 1, slug::VALIDATOR_WAITLIST, 10, 1_000);
    record(&store, 2, slug::VALIDATOR_WAITLIST, 20, 1_001);

    // A repair script rewrites points behind the engine's back.
    let mut e1 = store
        .get_entry(UserId::new(1), LeaderboardKind::ValidatorWaitlist)
        .unwrap()
        .unwrap();
    e1.total_points = 500;
    store.put_entry(&e1).unwrap();

    engine(&store).rank_all_kinds().unwrap();
    assert_eq!(entry(&store, 1, LeaderboardKind::ValidatorWaitlist), Some((500, Some(1), None)));
    assert_eq!(entry(&store, 2, LeaderboardKind::ValidatorWaitlist), Some((20, Some(2), None)));
}

#[test]
fn failed_writes_leave_no_derived_state() {
    let store = seed_store();
    add_user(&store, 1, "alice", 0, None);

    // No multiplier history for a brand-new type.
    store
        .put_type(&ContributionType {
            slug: "asimov".into(),
            name: "Asimov".into(),
            category: Some(Category::Builder),
            min_points: 1,
            max_points: 100,
            is_default: false,
            is_submittable: true,
        })
        .unwrap();

    let err = engine(&store)
        .record_contribution(UserId::new(1), "asimov", 10, RecordOptions::at(Timestamp::new(500)))
        .unwrap_err();
    assert!(matches!(
        err,
        LeaderboardError::Ledger(LedgerError::NoActiveMultiplier { .. })
    ));
    assert_eq!(entry(&store, 1, LeaderboardKind::Builder), None);
}

#[test]
fn bulk_uptime_requires_an_explicit_refresh() {
    let store = seed_store();
    add_user(&store, 1, "validator", 0, None);
    record(&store, 1, slug::VALIDATOR, 1, 0);
    let before = entry(&store, 1, LeaderboardKind::Validator).unwrap().0;

    record(&store, 1, slug::UPTIME, 1, Timestamp::from_day(10).as_secs());
    let generator = UptimeGenerator::new(&store, ProgramParams::testnet_defaults());
    let summary = generator
        .generate(Timestamp::from_day(13), UptimeOptions::default())
        .unwrap();
    assert_eq!(summary.created, 3);

    // The bulk insert itself did not touch the leaderboard.
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator).unwrap().0, before + 1);

    engine(&store).refresh_users(&summary.affected_users).unwrap();
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator).unwrap().0, before + 4);
}

#[test]
fn referrer_totals_can_be_rebuilt_from_scratch() {
    let store = seed_store();
    add_user(&store, 1, "referrer", 0, None);
    add_user(&store, 2, "referred", 0, Some(1));
    record(&store, 2, "node-running", 100, 1_000); // 200 frozen
    record(&store, 2, "code-contribution", 10, 2_000); // 15 frozen

    // A stray edit corrupts the stored bases.
    store
        .put_referral(&tally_store::ReferralPoints {
            user: UserId::new(1),
            builder_base: 999,
            validator_base: 999,
        })
        .unwrap();

    tally_leaderboard::referral::recalculate_referrer(&store, UserId::new(1)).unwrap();
    let rp = store.get_referral(UserId::new(1)).unwrap().unwrap();
    assert_eq!(rp.validator_base, 200);
    assert_eq!(rp.builder_base, 15);

    // The all-referrers rebuild drops rows for users who referred nobody
    // with eligible work.
    add_user(&store, 3, "idle-referrer", 0, None);
    add_user(&store, 4, "idle-referred", 0, Some(3));
    let processed = tally_leaderboard::referral::recalculate_all_referrers(&store).unwrap();
    assert_eq!(processed, 2);
    assert!(store.get_referral(UserId::new(3)).unwrap().is_none());
    assert_eq!(store.iter_referrals().unwrap().len(), 1);
}

#[test]
fn refreeze_then_rebuild_applies_corrected_history_everywhere() {
    let store = seed_store();
    add_user(&store, 1, "validator", 0, None);
    record(&store, 1, slug::VALIDATOR, 1, 1_000);
    record(&store, 1, "node-running", 50, 2_000); // frozen at 2.0x = 100
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator).unwrap().0, 101);

    // Correct the record: node-running should have been 1.0x all along.
    store
        .delete_multiplier("node-running", Timestamp::EPOCH)
        .unwrap();
    store
        .put_multiplier(&MultiplierRecord {
            type_slug: "node-running".into(),
            value_bps: 10_000,
            valid_from: Timestamp::EPOCH,
            description: "corrected".into(),
        })
        .unwrap();

    let recorder =
        tally_ledger::ContributionRecorder::new(&store, ProgramParams::testnet_defaults());
    let summary = recorder.refreeze_all().unwrap();
    assert_eq!(summary.updated, 1);
    engine(&store).recalculate_all().unwrap();

    // Totals now read as if the corrected history had always been current.
    assert_eq!(entry(&store, 1, LeaderboardKind::Validator).unwrap().0, 51);
}

/// Snapshot of both derived tables, for equality assertions.
fn dump_tables(
    store: &MemoryStore,
) -> (
    Vec<(u64, &'static str, u64, Option<u32>, Option<u64>)>,
    Vec<(u64, u64, u64)>,
) {
    let mut entries = Vec::new();
    for kind in LeaderboardKind::ALL {
        for e in store.entries_for_kind(kind).unwrap() {
            entries.push((
                e.user.raw(),
                kind.as_str(),
                e.total_points,
                e.rank,
                e.graduation_date.map(|t| t.as_secs()),
            ));
        }
    }
    entries.sort();
    let mut referrals: Vec<(u64, u64, u64)> = store
        .iter_referrals()
        .unwrap()
        .into_iter()
        .map(|r| (r.user.raw(), r.builder_base, r.validator_base))
        .collect();
    referrals.sort();
    (entries, referrals)
}
