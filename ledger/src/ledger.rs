//! Read-side facade over the contribution ledger.

use tally_store::{ContributionStore, ContributionTypeStore, StoreError, TallyStore, UserStore};

/// Summary statistics for the ledger, as surfaced on the program dashboard.
#[derive(Clone, Debug)]
pub struct LedgerSummary {
    pub users: u64,
    pub contribution_types: u64,
    pub contributions: u64,
    pub total_frozen_points: u64,
}

/// Unified read access to the ledger's stores.
pub struct Ledger<'a, S> {
    store: &'a S,
}

impl<'a, S: TallyStore> Ledger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn summary(&self) -> Result<LedgerSummary, StoreError> {
        let contributions = self.store.iter_contributions()?;
        Ok(LedgerSummary {
            users: self.store.user_count()?,
            contribution_types: self.store.iter_types()?.len() as u64,
            contributions: contributions.len() as u64,
            total_frozen_points: contributions.iter().map(|c| c.frozen_global_points).sum(),
        })
    }
}
