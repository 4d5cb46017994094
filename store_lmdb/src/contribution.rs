//! LMDB implementation of ContributionStore.
//!
//! Ids are assigned from a meta-database counter inside the same write
//! transaction as the insert, so an append is atomic.

use tally_store::{Contribution, ContributionStore, NewContribution, StoreError};
use tally_types::{ContributionId, UserId};

use crate::environment::NEXT_CONTRIBUTION_ID_KEY;
use crate::{LmdbError, LmdbStore};

fn contribution_key(id: ContributionId) -> [u8; 8] {
    id.raw().to_be_bytes()
}

impl ContributionStore for LmdbStore {
    fn append_contribution(&self, row: NewContribution) -> Result<Contribution, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let next = match self
            .meta
            .get(&wtxn, NEXT_CONTRIBUTION_ID_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption("next contribution id is not 8 bytes".into())
                })?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };

        let contribution = Contribution {
            id: ContributionId::new(next),
            user: row.user,
            type_slug: row.type_slug,
            points: row.points,
            multiplier_bps: row.multiplier_bps,
            frozen_global_points: row.frozen_global_points,
            contribution_date: row.contribution_date,
            notes: row.notes,
        };
        let bytes = bincode::serialize(&contribution).map_err(LmdbError::from)?;
        self.contributions
            .put(&mut wtxn, contribution_key(contribution.id).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        self.meta
            .put(
                &mut wtxn,
                NEXT_CONTRIBUTION_ID_KEY,
                (next + 1).to_be_bytes().as_slice(),
            )
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(contribution)
    }

    fn get_contribution(&self, id: ContributionId) -> Result<Contribution, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .contributions
            .get(&rtxn, contribution_key(id).as_slice())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("{id}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn update_contribution(&self, row: &Contribution) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .contributions
            .get(&wtxn, contribution_key(row.id).as_slice())
            .map_err(LmdbError::from)?
            .is_none()
        {
            return Err(LmdbError::NotFound(format!("{}", row.id)).into());
        }
        let bytes = bincode::serialize(row).map_err(LmdbError::from)?;
        self.contributions
            .put(&mut wtxn, contribution_key(row.id).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_contributions(&self) -> Result<Vec<Contribution>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut rows = Vec::new();
        // Big-endian id keys iterate in insertion order.
        for item in self.contributions.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            rows.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(rows)
    }

    fn contributions_for(&self, user: UserId) -> Result<Vec<Contribution>, StoreError> {
        Ok(self
            .iter_contributions()?
            .into_iter()
            .filter(|c: &Contribution| c.user == user)
            .collect())
    }
}
