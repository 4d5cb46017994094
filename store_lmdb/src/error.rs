use tally_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("key not found: {0}")]
    NotFound(String),
}

impl From<LmdbError> for StoreError {
    fn from(err: LmdbError) -> Self {
        match err {
            LmdbError::NotFound(key) => StoreError::NotFound(key),
            LmdbError::Bincode(e) => StoreError::Serialization(e.to_string()),
            LmdbError::Heed(e) => StoreError::Backend(e.to_string()),
        }
    }
}
