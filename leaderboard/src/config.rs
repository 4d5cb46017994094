//! Leaderboard configuration registry.
//!
//! A compile-time table mapping each kind to its membership predicate,
//! points calculator and ranking order. Both recalculation paths go through
//! this table, so kind semantics live in exactly one place.

use tally_types::{referral_cut, slug, Category, LeaderboardKind, ProgramParams, Timestamp};

use crate::view::UserView;

/// Primary sort for a kind's ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankOrder {
    /// Descending total points.
    PointsDesc,
    /// Descending graduation date (most recent graduate first).
    GraduationDesc,
}

/// A points calculation result; the graduation kind also yields the frozen
/// snapshot date.
#[derive(Clone, Copy, Debug)]
pub struct KindPoints {
    pub total: u64,
    pub graduation_date: Option<Timestamp>,
}

/// One kind's full definition.
pub struct KindSpec {
    pub kind: LeaderboardKind,
    pub order: RankOrder,
    qualifies: fn(&UserView) -> bool,
    points: fn(&UserView, &ProgramParams) -> KindPoints,
}

impl KindSpec {
    /// Whether the user belongs on this leaderboard.
    pub fn qualifies(&self, view: &UserView) -> bool {
        (self.qualifies)(view)
    }

    /// The user's points on this leaderboard. Only meaningful when
    /// `qualifies` holds.
    pub fn points(&self, view: &UserView, params: &ProgramParams) -> KindPoints {
        (self.points)(view, params)
    }
}

/// The registry, in `LeaderboardKind::ALL` order.
pub static REGISTRY: [KindSpec; 4] = [
    KindSpec {
        kind: LeaderboardKind::Validator,
        order: RankOrder::PointsDesc,
        qualifies: validator_qualifies,
        points: validator_points,
    },
    KindSpec {
        kind: LeaderboardKind::Builder,
        order: RankOrder::PointsDesc,
        qualifies: builder_qualifies,
        points: builder_points,
    },
    KindSpec {
        kind: LeaderboardKind::ValidatorWaitlist,
        order: RankOrder::PointsDesc,
        qualifies: waitlist_qualifies,
        points: waitlist_points,
    },
    KindSpec {
        kind: LeaderboardKind::ValidatorWaitlistGraduation,
        order: RankOrder::GraduationDesc,
        qualifies: graduation_qualifies,
        points: graduation_points,
    },
];

pub fn spec_for(kind: LeaderboardKind) -> &'static KindSpec {
    REGISTRY
        .iter()
        .find(|s| s.kind == kind)
        .expect("every kind is registered")
}

// ── validator ────────────────────────────────────────────────────────────

fn validator_qualifies(view: &UserView) -> bool {
    view.has_marker(slug::VALIDATOR)
}

/// All validator-category points, waitlist era included.
fn validator_points(view: &UserView, _params: &ProgramParams) -> KindPoints {
    KindPoints {
        total: view.category_points(Category::Validator, None),
        graduation_date: None,
    }
}

// ── builder ──────────────────────────────────────────────────────────────

/// Membership needs builder work beyond the welcome action; the welcome
/// points still count once the user qualifies.
fn builder_qualifies(view: &UserView) -> bool {
    view.rows
        .iter()
        .any(|r| r.category == Some(Category::Builder) && r.type_slug != slug::BUILDER_WELCOME)
}

fn builder_points(view: &UserView, _params: &ProgramParams) -> KindPoints {
    KindPoints {
        total: view.category_points(Category::Builder, None),
        graduation_date: None,
    }
}

// ── validator-waitlist ───────────────────────────────────────────────────

fn waitlist_qualifies(view: &UserView) -> bool {
    view.has_marker(slug::VALIDATOR_WAITLIST) && !view.has_marker(slug::VALIDATOR)
}

/// Own validator-category points plus the combined referral credit.
fn waitlist_points(view: &UserView, params: &ProgramParams) -> KindPoints {
    let (builder_base, validator_base) = view.referral_bases(None);
    let referral = referral_cut(builder_base, params.referral_reward_bps)
        + referral_cut(validator_base, params.referral_reward_bps);
    KindPoints {
        total: view.category_points(Category::Validator, None) + referral,
        graduation_date: None,
    }
}

// ── validator-waitlist-graduation ────────────────────────────────────────

fn graduation_qualifies(view: &UserView) -> bool {
    view.has_marker(slug::VALIDATOR_WAITLIST) && view.has_marker(slug::VALIDATOR)
}

/// One-time snapshot at the earliest graduation-marker date: own
/// validator-category points strictly before it, plus referral credit from
/// referred rows strictly before it. The marker row itself never counts
/// (its date is not strictly before itself).
fn graduation_points(view: &UserView, params: &ProgramParams) -> KindPoints {
    let graduated_at = view
        .earliest_marker_date(slug::VALIDATOR)
        .expect("graduation points computed only for graduated users");
    let (builder_base, validator_base) = view.referral_bases(Some(graduated_at));
    let referral = referral_cut(builder_base, params.referral_reward_bps)
        + referral_cut(validator_base, params.referral_reward_bps);
    KindPoints {
        total: view.category_points(Category::Validator, Some(graduated_at)) + referral,
        graduation_date: Some(graduated_at),
    }
}
