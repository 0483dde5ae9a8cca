use crate::config::DatabaseConfig;
use duckdb::{Connection, Result as DbResult};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::db::StoreError;

/// Base handle to the opened database.
///
/// Callers never query through it directly: [`DbPool::checkout`] hands out a
/// fresh connection to the same database, so concurrent calls run side by
/// side and the lock is only held while cloning.
#[derive(Clone)]
pub struct DbPool {
    base: Arc<Mutex<Connection>>,
}

impl DbPool {
    pub fn new(conn: Connection) -> Self {
        Self {
            base: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn checkout(&self) -> Result<Connection, StoreError> {
        let base = self.base.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(base.try_clone()?)
    }
}

pub const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    session_id VARCHAR PRIMARY KEY,
    messages VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL,
    updated_at VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_key VARCHAR PRIMARY KEY,
    sub VARCHAR,
    email VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    picture VARCHAR,
    email_verified BOOLEAN,
    hd VARCHAR,
    locale VARCHAR,
    phone VARCHAR,
    last_login_at VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);
"#;

pub fn get_connection(config: &DatabaseConfig) -> DbResult<DbPool> {
    info!("Connecting to DuckDB at {}", config.path);
    let conn = if config.path == IN_MEMORY {
        Connection::open_in_memory()?
    } else {
        Connection::open(&config.path)?
    };

    init_schema(&conn)?;

    Ok(DbPool::new(conn))
}

pub fn init_schema(conn: &Connection) -> DbResult<()> {
    info!("Initializing database schema");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
