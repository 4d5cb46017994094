//! LMDB implementation of ContributionTypeStore.

use tally_store::{ContributionType, ContributionTypeStore, StoreError};

use crate::{LmdbError, LmdbStore};

impl ContributionTypeStore for LmdbStore {
    fn get_type(&self, slug: &str) -> Result<ContributionType, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .types
            .get(&rtxn, slug.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("contribution type '{slug}'")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn put_type(&self, ty: &ContributionType) -> Result<(), StoreError> {
        let bytes = bincode::serialize(ty).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.types
            .put(&mut wtxn, ty.slug.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_types(&self) -> Result<Vec<ContributionType>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut types = Vec::new();
        for item in self.types.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            types.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(types)
    }
}
