//! SQLite database layer (embedded, no external dependencies)

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gift_core::ports::{GiftStore, UserGiftStore};
use gift_core::{
    GiftError, GiftFields, GiftId, GiftRecord, GiftSend, GiftStatus, Page, Result, UserGiftDetail,
    UserGiftId, UserGiftRecord, UserId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

const USER_GIFT_DETAIL_SELECT: &str = r#"
    SELECT ug.id, ug.gift_id, ug.from_user_id, ug.from_user_name,
           ug.to_user_id, ug.to_user_name, ug.message, ug.status, ug.created_at,
           g.name AS gift_name, g.description AS gift_description,
           g.given_count AS gift_given_count
    FROM user_gift ug
    INNER JOIN gift g ON ug.gift_id = g.id
"#;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. A single connection is kept open for the
    /// lifetime of the pool, since each SQLite connection gets its own
    /// memory database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
        // Gift catalog
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gift (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category INTEGER NOT NULL DEFAULT 0,
                threshold INTEGER NOT NULL DEFAULT 0,
                given_count INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Given gifts; status 1 = unread, 0 = read
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_gift (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                gift_id INTEGER NOT NULL REFERENCES gift(id),
                from_user_id INTEGER NOT NULL,
                from_user_name TEXT NOT NULL,
                to_user_id INTEGER NOT NULL,
                to_user_name TEXT NOT NULL,
                message TEXT NOT NULL DEFAULT '',
                status INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_user_gift_to_status
            ON user_gift (to_user_id, status)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> GiftError {
    GiftError::Database(e.to_string())
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// `LIMIT -1` is "no limit" in SQLite
fn limit_offset(page: Page) -> (i64, i64) {
    (page.limit().unwrap_or(-1), page.offset())
}

#[async_trait]
impl GiftStore for Database {
    async fn get_gift(&self, id: GiftId) -> Result<Option<GiftRecord>> {
        let row: Option<GiftRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, category, threshold, given_count, created_at
            FROM gift WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn add_gift(&self, fields: &GiftFields) -> Result<GiftId> {
        let result = sqlx::query(
            r#"
            INSERT INTO gift (name, description, category, threshold, given_count, created_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.category)
        .bind(fields.threshold)
        .bind(Utc::now())
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(GiftId(result.last_insert_rowid()))
    }

    async fn update_gift(&self, id: GiftId, fields: &GiftFields) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE gift SET name = ?1, description = ?2, category = ?3, threshold = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.category)
        .bind(fields.threshold)
        .bind(id.get())
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(GiftError::GiftNotFound(id));
        }
        Ok(())
    }

    async fn list_gifts(&self, page: Page) -> Result<Vec<GiftRecord>> {
        let (limit, offset) = limit_offset(page);
        let rows: Vec<GiftRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, category, threshold, given_count, created_at
            FROM gift
            ORDER BY id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl UserGiftStore for Database {
    async fn record_gift_send(&self, send: &GiftSend) -> Result<UserGiftId> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM gift WHERE id = ?1")
            .bind(send.gift_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        if exists.is_none() {
            // Dropping the transaction rolls it back
            return Err(GiftError::GiftNotFound(send.gift_id));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_gift (gift_id, from_user_id, from_user_name, to_user_id,
                                   to_user_name, message, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(send.gift_id.get())
        .bind(send.from.id.get())
        .bind(&send.from.name)
        .bind(send.to.id.get())
        .bind(&send.to.name)
        .bind(&send.message)
        .bind(GiftStatus::Unread.as_db())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query("UPDATE gift SET given_count = given_count + 1 WHERE id = ?1")
            .bind(send.gift_id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(UserGiftId(inserted.last_insert_rowid()))
    }

    async fn get_user_gift(&self, id: UserGiftId) -> Result<Option<UserGiftDetail>> {
        let sql = format!("{USER_GIFT_DETAIL_SELECT} WHERE ug.id = ?1 LIMIT 1");
        let row: Option<UserGiftDetailRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn count_unread(&self, to_user: UserId) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_gift WHERE to_user_id = ?1 AND status = ?2")
                .bind(to_user.get())
                .bind(GiftStatus::Unread.as_db())
                .fetch_one(&*self.pool)
                .await
                .map_err(db_error)?;

        Ok(count_to_u64(count))
    }

    async fn count_received(&self, to_user: UserId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_gift WHERE to_user_id = ?1")
            .bind(to_user.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(db_error)?;

        Ok(count_to_u64(count))
    }

    async fn mark_read(&self, id: UserGiftId) -> Result<Option<UserGiftRecord>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row: Option<UserGiftRow> = sqlx::query_as(
            r#"
            SELECT id, gift_id, from_user_id, from_user_name, to_user_id,
                   to_user_name, message, status, created_at
            FROM user_gift WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
        let Some(previous) = row.map(UserGiftRecord::from) else {
            return Ok(None);
        };

        if previous.status.is_unread() {
            sqlx::query("UPDATE user_gift SET status = ?1 WHERE id = ?2")
                .bind(GiftStatus::Read.as_db())
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(Some(previous))
    }

    async fn mark_all_read(&self, to_user: UserId) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE user_gift SET status = ?1
            WHERE to_user_id = ?2 AND status = ?3
            "#,
        )
        .bind(GiftStatus::Read.as_db())
        .bind(to_user.get())
        .bind(GiftStatus::Unread.as_db())
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_user_gift(&self, id: UserGiftId) -> Result<Option<UserGiftRecord>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row: Option<UserGiftRow> = sqlx::query_as(
            r#"
            SELECT id, gift_id, from_user_id, from_user_name, to_user_id,
                   to_user_name, message, status, created_at
            FROM user_gift WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        if row.is_some() {
            sqlx::query("DELETE FROM user_gift WHERE id = ?1")
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_received(&self, to_user: UserId, page: Page) -> Result<Vec<UserGiftDetail>> {
        let (limit, offset) = limit_offset(page);
        let sql = format!(
            "{USER_GIFT_DETAIL_SELECT} WHERE ug.to_user_id = ?1 ORDER BY ug.id DESC LIMIT ?2 OFFSET ?3"
        );
        let rows: Vec<UserGiftDetailRow> = sqlx::query_as(&sql)
            .bind(to_user.get())
            .bind(limit)
            .bind(offset)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self, page: Page) -> Result<Vec<UserGiftDetail>> {
        let (limit, offset) = limit_offset(page);
        let sql = format!("{USER_GIFT_DETAIL_SELECT} ORDER BY ug.id DESC LIMIT ?1 OFFSET ?2");
        let rows: Vec<UserGiftDetailRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct GiftRow {
    id: i64,
    name: String,
    description: String,
    category: i64,
    threshold: i64,
    given_count: i64,
    created_at: DateTime<Utc>,
}

impl From<GiftRow> for GiftRecord {
    fn from(r: GiftRow) -> Self {
        GiftRecord {
            id: GiftId(r.id),
            name: r.name,
            description: r.description,
            category: r.category,
            threshold: r.threshold,
            given_count: r.given_count,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserGiftRow {
    id: i64,
    gift_id: i64,
    from_user_id: i64,
    from_user_name: String,
    to_user_id: i64,
    to_user_name: String,
    message: String,
    status: i64,
    created_at: DateTime<Utc>,
}

impl From<UserGiftRow> for UserGiftRecord {
    fn from(r: UserGiftRow) -> Self {
        UserGiftRecord {
            id: UserGiftId(r.id),
            gift_id: GiftId(r.gift_id),
            from_user_id: UserId(r.from_user_id),
            from_user_name: r.from_user_name,
            to_user_id: UserId(r.to_user_id),
            to_user_name: r.to_user_name,
            message: r.message,
            status: GiftStatus::from_db(r.status),
            timestamp: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserGiftDetailRow {
    #[sqlx(flatten)]
    record: UserGiftRow,
    gift_name: String,
    gift_description: String,
    gift_given_count: i64,
}

impl From<UserGiftDetailRow> for UserGiftDetail {
    fn from(r: UserGiftDetailRow) -> Self {
        UserGiftDetail {
            record: r.record.into(),
            gift_name: r.gift_name,
            gift_description: r.gift_description,
            gift_given_count: r.gift_given_count,
        }
    }
}
