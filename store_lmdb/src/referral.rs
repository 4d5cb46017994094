//! LMDB implementation of ReferralStore.

use tally_store::{ReferralPoints, ReferralStore, StoreError};
use tally_types::UserId;

use crate::environment::user_key;
use crate::{LmdbError, LmdbStore};

impl ReferralStore for LmdbStore {
    fn get_referral(&self, user: UserId) -> Result<Option<ReferralPoints>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .referrals
            .get(&rtxn, user_key(user).as_slice())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_referral(&self, record: &ReferralPoints) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.referrals
            .put(&mut wtxn, user_key(record.user).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// One transaction for the whole batch.
    fn put_referrals(&self, records: &[ReferralPoints]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for record in records {
            let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
            self.referrals
                .put(&mut wtxn, user_key(record.user).as_slice(), &bytes)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_referral(&self, user: UserId) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.referrals
            .delete(&mut wtxn, user_key(user).as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_referrals(&self) -> Result<Vec<ReferralPoints>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for item in self.referrals.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            records.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(records)
    }

    fn clear_referrals(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.referrals.clear(&mut wtxn).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
