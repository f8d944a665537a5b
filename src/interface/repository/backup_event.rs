use crate::core::infrastructure::database_manager::DatabaseManager;
use crate::model::backup_record::BackupRecord;
use crate::model::error::Error;
use crate::model::error::database::DatabaseError;
use crate::model::log::database::DatabaseLog;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use macros::log;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

pub const BACKUP_EVENT_TABLE: &str = "BackupEvents";

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events of `machine` at or after `since`, oldest first.
    async fn find_backup_events(
        &self,
        machine: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<BackupRecord>, Error>;

    async fn record_backup_event(&self, record: &BackupRecord) -> Result<(), Error>;
}

impl DatabaseManager {
    pub async fn create_backup_event_table(&self) -> Result<(), Error> {
        let pool = self.get_pool();
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS BackupEvents (
                uuid BLOB PRIMARY KEY,
                machine TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                exit_code INTEGER,
                transfer_size INTEGER NOT NULL,
                duration_ms INTEGER NOT NULL,
                reason TEXT NOT NULL,
                message TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(DatabaseError::StatementExecutionFailed)?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS BackupEventsByMachine ON BackupEvents (machine, timestamp)",
        )
        .execute(&pool)
        .await
        .map_err(DatabaseError::StatementExecutionFailed)?;
        log!(DatabaseLog::TableCreated {
            table: BACKUP_EVENT_TABLE.to_string()
        });
        Ok(())
    }
}

#[async_trait]
impl EventStore for DatabaseManager {
    async fn find_backup_events(
        &self,
        machine: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<BackupRecord>, Error> {
        let pool = self.get_pool();
        let rows = sqlx::query(
            r#"
            SELECT
                uuid,
                machine,
                timestamp,
                exit_code,
                transfer_size,
                duration_ms,
                reason,
                message
            FROM BackupEvents
            WHERE machine = ? AND timestamp >= ?
            ORDER BY timestamp ASC
            "#,
        )
        .bind(machine)
        .bind(since)
        .fetch_all(&pool)
        .await
        .map_err(DatabaseError::StatementExecutionFailed)?;

        rows.iter().map(record_from_row).collect()
    }

    async fn record_backup_event(&self, record: &BackupRecord) -> Result<(), Error> {
        let pool = self.get_pool();
        sqlx::query(
            r#"
            INSERT INTO BackupEvents (
                uuid,
                machine,
                timestamp,
                exit_code,
                transfer_size,
                duration_ms,
                reason,
                message
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.uuid.as_bytes().as_slice())
        .bind(&record.machine)
        .bind(record.timestamp)
        .bind(record.exit_code)
        .bind(i64::try_from(record.transfer_size).unwrap_or(i64::MAX))
        .bind(i64::try_from(record.duration_ms).unwrap_or(i64::MAX))
        .bind(serde_json::to_string(&record.reason).map_err(DatabaseError::DataCorrupted)?)
        .bind(&record.message)
        .execute(&pool)
        .await
        .map_err(DatabaseError::StatementExecutionFailed)?;
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<BackupRecord, Error> {
    let uuid_bytes: Vec<u8> = row.try_get("uuid").map_err(DatabaseError::DataCorrupted)?;
    let uuid = Uuid::from_slice(&uuid_bytes).map_err(DatabaseError::DataCorrupted)?;

    let reason_str: String = row.try_get("reason").map_err(DatabaseError::DataCorrupted)?;
    let reason = serde_json::from_str(&reason_str).map_err(DatabaseError::DataCorrupted)?;

    let transfer_size: i64 = row
        .try_get("transfer_size")
        .map_err(DatabaseError::DataCorrupted)?;
    let duration_ms: i64 = row
        .try_get("duration_ms")
        .map_err(DatabaseError::DataCorrupted)?;

    Ok(BackupRecord {
        uuid,
        machine: row.try_get("machine").map_err(DatabaseError::DataCorrupted)?,
        timestamp: row.try_get("timestamp").map_err(DatabaseError::DataCorrupted)?,
        exit_code: row.try_get("exit_code").map_err(DatabaseError::DataCorrupted)?,
        transfer_size: u64::try_from(transfer_size).map_err(DatabaseError::DataCorrupted)?,
        duration_ms: u64::try_from(duration_ms).map_err(DatabaseError::DataCorrupted)?,
        reason,
        message: row.try_get("message").map_err(DatabaseError::DataCorrupted)?,
    })
}
