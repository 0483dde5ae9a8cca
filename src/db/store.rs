use duckdb::Connection;
use std::time::Duration;
use thiserror::Error;

use crate::db::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database Error: {0}")]
    Database(#[from] duckdb::Error),
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Store base connection lock poisoned")]
    Poisoned,
    #[error("Store task failed: {0}")]
    Task(String),
}

/// Process-wide handle to the document store.
///
/// Each call checks out its own connection and runs on the blocking pool, so
/// a slow query never stalls the async workers or calls on other keys. Calls
/// are cut off after the configured timeout; per-key atomicity comes from the
/// single-statement upserts.
#[derive(Clone)]
pub struct DocumentStore {
    pool: DbPool,
    timeout: Duration,
}

impl DocumentStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> duckdb::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = pool.checkout()?;
            op(&conn).map_err(StoreError::from)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(StoreError::Task(join_err.to_string())),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}
