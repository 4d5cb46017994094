//! LMDB implementation of UserStore.

use tally_store::{StoreError, UserRecord, UserStore};
use tally_types::UserId;

use crate::environment::user_key;
use crate::{LmdbError, LmdbStore};

impl UserStore for LmdbStore {
    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .users
            .get(&rtxn, user_key(id).as_slice())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("{id}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn put_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(user).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.users
            .put(&mut wtxn, user_key(user.id).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn user_exists(&self, id: UserId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .users
            .get(&rtxn, user_key(id).as_slice())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut users = Vec::new();
        for item in self.users.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            users.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(users)
    }
}
