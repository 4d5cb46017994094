//! Well-known contribution-type slugs.
//!
//! Marker contributions signal program state by their mere existence:
//! `validator` marks graduation to full validator status,
//! `validator-waitlist` marks joining the waitlist, and `builder-welcome`
//! is the builder onboarding action. Marker slugs are referenced by the
//! leaderboard membership predicates and the referral countability rule.

/// Graduation marker — the user is a full validator.
pub const VALIDATOR: &str = "validator";

/// Waitlist marker — the user joined the validator waitlist.
pub const VALIDATOR_WAITLIST: &str = "validator-waitlist";

/// Builder onboarding action. Counts toward builder points but does not by
/// itself confer builder-leaderboard membership.
pub const BUILDER_WELCOME: &str = "builder-welcome";

/// Daily node-uptime contribution, generated by the uptime generator.
pub const UPTIME: &str = "uptime";
