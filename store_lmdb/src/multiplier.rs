//! LMDB implementation of MultiplierStore.

use tally_store::{MultiplierRecord, MultiplierStore, StoreError};
use tally_types::Timestamp;

use crate::environment::{multiplier_key, multiplier_prefix};
use crate::{LmdbError, LmdbStore};

impl MultiplierStore for LmdbStore {
    fn put_multiplier(&self, record: &MultiplierRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let key = multiplier_key(&record.type_slug, record.valid_from);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.multipliers
            .put(&mut wtxn, key.as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn multipliers_for(&self, type_slug: &str) -> Result<Vec<MultiplierRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = multiplier_prefix(type_slug);
        let mut history = Vec::new();
        // Keys embed valid_from big-endian, so the prefix range comes back
        // already sorted ascending.
        for item in self
            .multipliers
            .prefix_iter(&rtxn, prefix.as_slice())
            .map_err(LmdbError::from)?
        {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            history.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(history)
    }

    fn iter_multipliers(&self) -> Result<Vec<MultiplierRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for item in self.multipliers.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            records.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(records)
    }

    fn delete_multiplier(&self, type_slug: &str, valid_from: Timestamp) -> Result<(), StoreError> {
        let key = multiplier_key(type_slug, valid_from);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.multipliers
            .delete(&mut wtxn, key.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
