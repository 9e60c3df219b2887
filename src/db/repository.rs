//! Page storage behind a trait so the HTTP layer runs with or without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::sync::Mutex;

use super::models::{NewPage, PageRow};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Create/get/list over published pages. Pages are never updated or deleted.
#[async_trait]
pub trait PageRepository: Send + Sync + 'static {
    /// Store a prepared page and return its new id.
    async fn create(&self, page: NewPage) -> Result<i32, RepositoryError>;

    /// `None` when no page has this id.
    async fn get_by_id(&self, id: i32) -> Result<Option<PageRow>, RepositoryError>;

    /// All pages, newest first.
    async fn list_all(&self) -> Result<Vec<PageRow>, RepositoryError>;

    /// Round-trip latency of the backing store.
    async fn ping(&self) -> Result<Duration, RepositoryError>;

    /// Name reported by health checks.
    fn backend(&self) -> &'static str;
}

// ============================================================================
// PostgreSQL
// ============================================================================

const SELECT_PAGE: &str = r#"
    SELECT id,
           COALESCE(name, 'Anonyme') AS name,
           COALESCE(content, '') AS content,
           NULLIF(bg_image, '') AS bg_image,
           NULLIF(orientation, '') AS orientation,
           COALESCE(created_at, now()) AS created_at
    FROM student_pages
"#;

pub struct PgPageRepository {
    pool: Arc<PgPool>,
}

impl PgPageRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for PgPageRepository {
    async fn create(&self, page: NewPage) -> Result<i32, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO student_pages (name, content, bg_image, orientation, created_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING id
            "#,
        )
        .bind(&page.name)
        .bind(&page.content)
        .bind(&page.bg_image)
        .bind(&page.orientation)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<PageRow>, RepositoryError> {
        let row = sqlx::query_as::<_, PageRow>(&format!("{SELECT_PAGE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<PageRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, PageRow>(&format!(
            "{SELECT_PAGE} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<Duration, RepositoryError> {
        if self.pool.is_closed() {
            return Err(RepositoryError::Unavailable("connection pool is closed".into()));
        }
        let start = Instant::now();
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;
        Ok(start.elapsed())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Volatile store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryPageRepository {
    rows: Mutex<Vec<PageRow>>,
}

impl MemoryPageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, keeping its id and timestamp.
    pub async fn insert_row(&self, row: PageRow) {
        self.rows.lock().await.push(row);
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl PageRepository for MemoryPageRepository {
    async fn create(&self, page: NewPage) -> Result<i32, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rows.push(PageRow {
            id,
            name: page.name,
            content: page.content,
            bg_image: page.bg_image,
            orientation: page.orientation,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<PageRow>, RepositoryError> {
        Ok(self.rows.lock().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<PageRow>, RepositoryError> {
        let mut rows = self.rows.lock().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn ping(&self) -> Result<Duration, RepositoryError> {
        let start = Instant::now();
        drop(self.rows.lock().await);
        Ok(start.elapsed())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn new_page(name: &str) -> NewPage {
        NewPage {
            name: name.to_string(),
            content: "[]".to_string(),
            bg_image: None,
            orientation: None,
        }
    }

    #[tokio::test]
    async fn test_memory_create_assigns_sequential_ids() {
        let repo = MemoryPageRepository::new();
        assert_eq!(repo.create(new_page("a")).await.unwrap(), 1);
        assert_eq!(repo.create(new_page("b")).await.unwrap(), 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_memory_get_missing_is_none() {
        let repo = MemoryPageRepository::new();
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_list_newest_first() {
        let repo = MemoryPageRepository::new();
        let now = Utc::now();
        for (id, age) in [(1, 3), (2, 1), (3, 2)] {
            repo.insert_row(PageRow {
                id,
                name: format!("p{id}"),
                content: "[]".to_string(),
                bg_image: None,
                orientation: None,
                created_at: now - ChronoDuration::minutes(age),
            })
            .await;
        }
        let ids: Vec<i32> = repo.list_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn test_select_fills_legacy_nulls() {
        for column in ["name", "content", "created_at"] {
            assert!(
                SELECT_PAGE.contains(&format!("COALESCE({column},")),
                "{column} is not defaulted"
            );
        }
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://pages@127.0.0.1:1/pages")
            .unwrap();
        pool.close().await;
        let repo = PgPageRepository::new(Arc::new(pool));
        assert!(matches!(
            repo.ping().await,
            Err(RepositoryError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_ping() {
        let repo = MemoryPageRepository::new();
        assert!(repo.ping().await.is_ok());
        assert_eq!(repo.backend(), "memory");
    }
}
