//! libSQL-backed record store.

use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Row, params};
use std::path::Path;
use std::sync::Arc;

use super::RecordStore;
use super::error::StoreError;
use super::model::{CafeDetails, CafeRecord};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cafes (
    id          TEXT PRIMARY KEY,
    list_id     TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    address     TEXT NOT NULL,
    img         TEXT,
    instagram   TEXT,
    keywords    TEXT NOT NULL DEFAULT '[]',
    description TEXT NOT NULL DEFAULT '',
    my_comment  TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)
"#;

const COLUMNS: &str =
    "id, list_id, name, address, img, instagram, keywords, description, my_comment, \
     created_at, updated_at";

/// Cafe records in a local libSQL database.
#[derive(Clone)]
pub struct LibsqlStore {
    db: Arc<libsql::Database>,
}

impl LibsqlStore {
    /// Opens (creating if needed) the database at `path` and ensures the
    /// schema exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::OpenFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let store = Self { db: Arc::new(db) };

        let conn = store.connect()?;
        conn.execute(SCHEMA, ()).await?;

        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        self.db.connect().map_err(StoreError::from)
    }

    fn row_to_record(row: &Row) -> Result<CafeRecord, StoreError> {
        let keywords_json: String = row.get(6)?;
        let keywords =
            serde_json::from_str(&keywords_json).map_err(|e| StoreError::DecodeFailed {
                message: e.to_string(),
            })?;

        let created_at: String = row.get(9)?;
        let updated_at: String = row.get(10)?;

        Ok(CafeRecord {
            id: row.get(0)?,
            list_id: row.get(1)?,
            name: row.get(2)?,
            address: row.get(3)?,
            img: row.get(4)?,
            instagram: row.get(5)?,
            keywords,
            description: row.get(7)?,
            my_comment: row.get(8)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::DecodeFailed {
            message: format!("bad timestamp '{value}': {e}"),
        })
}

fn encode_keywords(keywords: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(keywords).map_err(|e| StoreError::EncodeFailed {
        message: e.to_string(),
    })
}

impl RecordStore for LibsqlStore {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<CafeRecord>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut placeholders = String::new();
        for i in 0..ids.len() {
            if i > 0 {
                placeholders.push_str(", ");
            }
            placeholders.push('?');
            placeholders.push_str(&(i + 1).to_string());
        }

        let sql = format!("SELECT {COLUMNS} FROM cafes WHERE id IN ({placeholders})");
        let bound: Vec<libsql::Value> = ids
            .iter()
            .map(|id| libsql::Value::from(id.clone()))
            .collect();

        let conn = self.connect()?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(bound)).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }
        Ok(records)
    }

    async fn get_by_list_id(&self, list_id: &str) -> Result<Option<CafeRecord>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                &format!("SELECT {COLUMNS} FROM cafes WHERE list_id = ?1"),
                params![list_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<CafeRecord>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                &format!("SELECT {COLUMNS} FROM cafes ORDER BY created_at DESC"),
                (),
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }
        Ok(records)
    }

    async fn insert(&self, record: &CafeRecord) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO cafes (
                id, list_id, name, address, img, instagram, keywords,
                description, my_comment, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.id.clone(),
                record.list_id.clone(),
                record.name.clone(),
                record.address.clone(),
                record.img.clone(),
                record.instagram.clone(),
                encode_keywords(&record.keywords)?,
                record.description.clone(),
                record.my_comment.clone(),
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    async fn update_details(
        &self,
        list_id: &str,
        details: &CafeDetails,
        now: DateTime<Utc>,
    ) -> Result<CafeRecord, StoreError> {
        let conn = self.connect()?;
        let affected = conn
            .execute(
                r#"
                UPDATE cafes SET
                    description = ?2,
                    my_comment = ?3,
                    instagram = ?4,
                    keywords = ?5,
                    updated_at = ?6
                WHERE list_id = ?1
                "#,
                params![
                    list_id,
                    details.description.clone(),
                    details.my_comment.clone(),
                    details.instagram.clone(),
                    encode_keywords(&details.keywords)?,
                    now.to_rfc3339(),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                list_id: list_id.to_string(),
            });
        }

        self.get_by_list_id(list_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                list_id: list_id.to_string(),
            })
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let affected = conn
            .execute("DELETE FROM cafes WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }
}
