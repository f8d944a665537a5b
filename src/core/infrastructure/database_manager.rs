use crate::interface::repository::backup_event::BACKUP_EVENT_TABLE;
use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::database::DatabaseError;
use crate::model::log::database::DatabaseLog;
use macros::log;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[derive(Debug)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(DatabaseError::DatabaseConnectFailed)?;
        log!(DatabaseLog::DatabaseConnectSuccess);
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, Error> {
        let database_manager = Self { pool };
        if !database_manager.exist_table(BACKUP_EVENT_TABLE).await {
            database_manager.create_backup_event_table().await?;
        }
        Ok(database_manager)
    }

    /// A private database living as long as the returned manager.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(DatabaseError::DatabaseConnectFailed)?;
        Self::from_pool(pool).await
    }

    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn exist_table(&self, table_name: &str) -> bool {
        let pool = self.get_pool();
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?)",
        )
        .bind(table_name)
        .fetch_one(&pool)
        .await
        .unwrap_or(false)
    }

    pub async fn close(&self) {
        self.pool.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_event_table_once() {
        let database = DatabaseManager::in_memory().await.unwrap();
        assert!(database.exist_table(BACKUP_EVENT_TABLE).await);
        assert!(!database.exist_table("Missing").await);

        let again = DatabaseManager::from_pool(database.get_pool()).await;
        assert!(again.is_ok());
    }
}
