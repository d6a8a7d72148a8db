//! tower-sessions store that keeps sessions in the application database,
//! sharing its connection pool

use axum::async_trait;
use deadpool_sqlite::{Object, Pool};
use rusqlite::{params, OptionalExtension};
use thiserror::Error;
use tower_sessions::{
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store, ExpiredDeletion, SessionStore,
};

const DEFAULT_TABLE_NAME: &str = "user_session";

#[derive(Debug, Error)]
pub enum DeadpoolSqliteStoreError {
    #[error("Deadpool interact error: {0}")]
    DeadpoolInteract(#[from] deadpool_sqlite::InteractError),
    #[error("Deadpool pool error: {0}")]
    DeadpoolPool(#[from] deadpool_sqlite::PoolError),
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Serde json decode error: {0}")]
    JsonDecode(serde_json::Error),
    #[error("Serde json encode error: {0}")]
    JsonEncode(serde_json::Error),
}

impl From<DeadpoolSqliteStoreError> for session_store::Error {
    fn from(err: DeadpoolSqliteStoreError) -> Self {
        use session_store::Error;
        use DeadpoolSqliteStoreError::*;

        match err {
            JsonEncode(inner) => Error::Encode(inner.to_string()),
            JsonDecode(inner) => Error::Decode(inner.to_string()),
            other => Error::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeadpoolSqliteStore {
    pool: Pool,
    table_name: String,
}

impl DeadpoolSqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool, table_name: DEFAULT_TABLE_NAME.to_owned() }
    }

    pub async fn get_conn(&self) -> Result<Object, session_store::Error> {
        Ok(self.pool.get().await.map_err(DeadpoolSqliteStoreError::from)?)
    }

    pub async fn migrate(&self) -> Result<(), session_store::Error> {
        let conn = self.get_conn().await?;

        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                id TEXT PRIMARY KEY NOT NULL,
                data BLOB NOT NULL,
                expiry_date INTEGER NOT NULL
            );"#,
            self.table_name
        );

        conn.interact(move |conn| conn.execute(&sql, ()))
            .await
            .map_err(DeadpoolSqliteStoreError::from)?
            .map_err(DeadpoolSqliteStoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for DeadpoolSqliteStore {
    async fn delete_expired(&self) -> Result<(), session_store::Error> {
        let sql = format!(r#"DELETE FROM "{}" WHERE expiry_date < ?1"#, self.table_name);
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let conn = self.get_conn().await?;

        conn.interact(move |conn| conn.execute(&sql, params![now]))
            .await
            .map_err(DeadpoolSqliteStoreError::from)?
            .map_err(DeadpoolSqliteStoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for DeadpoolSqliteStore {
    async fn create(&self, record: &mut Record) -> Result<(), session_store::Error> {
        let exists_sql = format!(r#"SELECT 1 FROM "{}" WHERE id = ?1"#, self.table_name);
        let insert_sql = format!(
            r#"INSERT INTO "{}" (id, data, expiry_date) VALUES (?1, ?2, ?3)"#,
            self.table_name
        );

        let mut id = record.id;
        let payload = serde_json::to_vec(&record).map_err(DeadpoolSqliteStoreError::JsonEncode)?;
        let expiry = record.expiry_date.unix_timestamp();

        let conn = self.get_conn().await?;
        let id = conn
            .interact(move |conn| {
                let tx = conn.transaction()?;

                {
                    let mut exists_stmt = tx.prepare_cached(&exists_sql)?;

                    // Re-key the record until we successfully find a unique ID
                    while exists_stmt.exists(params![id.to_string()])? {
                        id = Id::default();
                    }
                }

                tx.prepare_cached(&insert_sql)?.execute(params![id.to_string(), payload, expiry])?;

                tx.commit()?;

                Ok::<_, DeadpoolSqliteStoreError>(id)
            })
            .await
            .map_err(DeadpoolSqliteStoreError::from)??;

        record.id = id;

        Ok(())
    }

    async fn save(&self, record: &Record) -> Result<(), session_store::Error> {
        // Upsert so a record whose row was swept in the meantime is written back
        let upsert_sql = format!(
            r#"
            INSERT INTO "{}" (id, data, expiry_date) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                expiry_date = excluded.expiry_date
            "#,
            self.table_name
        );

        let id = record.id.to_string();
        let payload = serde_json::to_vec(&record).map_err(DeadpoolSqliteStoreError::JsonEncode)?;
        let expiry = record.expiry_date.unix_timestamp();

        let conn = self.get_conn().await?;
        conn.interact(move |conn| {
            conn.prepare_cached(&upsert_sql)?.execute(params![id, payload, expiry])?;
            Ok::<_, DeadpoolSqliteStoreError>(())
        })
        .await
        .map_err(DeadpoolSqliteStoreError::from)??;

        Ok(())
    }

    async fn load(&self, id: &Id) -> Result<Option<Record>, session_store::Error> {
        let select_sql = format!(
            r#"SELECT data FROM "{}" WHERE id = ?1 AND expiry_date > ?2"#,
            self.table_name
        );

        let conn = self.get_conn().await?;
        let id_string = id.to_string();
        let payload = conn
            .interact(move |conn| {
                let now = OffsetDateTime::now_utc().unix_timestamp();

                let data = conn
                    .prepare_cached(&select_sql)?
                    .query_row(params![id_string, now], |row| row.get::<_, Vec<u8>>(0))
                    .optional()?;

                Ok::<_, DeadpoolSqliteStoreError>(data)
            })
            .await
            .map_err(DeadpoolSqliteStoreError::from)??;

        let record = payload
            .map(|data| serde_json::from_slice::<Record>(&data))
            .transpose()
            .map_err(DeadpoolSqliteStoreError::JsonDecode)?
            .map(|mut record| {
                // Make sure the id is updated after the re-keying done during insert
                record.id = *id;
                record
            });

        Ok(record)
    }

    async fn delete(&self, id: &Id) -> Result<(), session_store::Error> {
        let delete_sql = format!(r#"DELETE FROM "{}" WHERE id = ?1"#, self.table_name);

        let conn = self.get_conn().await?;
        let id_string = id.to_string();
        conn.interact(move |conn| {
            conn.prepare_cached(&delete_sql)?.execute(params![id_string])?;
            Ok::<_, DeadpoolSqliteStoreError>(())
        })
        .await
        .map_err(DeadpoolSqliteStoreError::from)??;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::db;

    fn test_pool(dir: &tempfile::TempDir) -> Pool {
        let path = dir.path().join("sessions.sqlite");
        db::create_pool(path.to_str().unwrap()).unwrap()
    }

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record { id: Id::default(), data: HashMap::new(), expiry_date }
    }

    #[tokio::test]
    async fn test_create_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeadpoolSqliteStore::new(test_pool(&dir));
        store.migrate().await.unwrap();

        let mut rec = record(OffsetDateTime::now_utc() + tower_sessions::cookie::time::Duration::hours(1));
        store.create(&mut rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);
        assert_eq!(loaded.expiry_date.unix_timestamp(), rec.expiry_date.unix_timestamp());

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_hidden_and_swept() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeadpoolSqliteStore::new(test_pool(&dir));
        store.migrate().await.unwrap();

        let mut rec = record(OffsetDateTime::now_utc() - tower_sessions::cookie::time::Duration::hours(1));
        store.create(&mut rec).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());

        store.delete_expired().await.unwrap();
        let conn = store.get_conn().await.unwrap();
        let count: i64 = conn
            .interact(|conn| conn.query_row("SELECT COUNT(*) FROM user_session", [], |r| r.get(0)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(count, 0);
    }
}
