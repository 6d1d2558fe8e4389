// Document Store.
//
// Persistence is whole-document: the scalar columns feed the list
// projection, and the entire tab tree lives in one jsonb column. There are
// no transactions and no concurrency token — concurrent writers to the same
// title race at `save` and the later write wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quire_common::types::{Document, DocumentMeta, Tab};
use sqlx::{types::Json, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub enum DocumentStore {
    Postgres(PgPool),
    #[cfg_attr(not(test), allow(dead_code))]
    Memory(Arc<RwLock<MemoryDocumentStore>>),
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(RwLock::new(MemoryDocumentStore::default())))
    }

    /// Point lookup by primary key.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Document>, StoreError> {
        match self {
            Self::Postgres(pool) => find_by_title_pg(pool, title).await,
            Self::Memory(store) => Ok(store.read().await.documents.get(title).cloned()),
        }
    }

    /// List projection: every document, content omitted.
    pub async fn find_all(&self) -> Result<Vec<DocumentMeta>, StoreError> {
        match self {
            Self::Postgres(pool) => find_all_pg(pool, false).await,
            Self::Memory(store) => Ok(list_mem(store, false).await),
        }
    }

    /// Same projection, restricted to `archived = false`.
    ///
    /// Present in the store but deliberately not wired to the listing
    /// operation; the listing endpoint returns archived documents too.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn find_all_excluding_archived(&self) -> Result<Vec<DocumentMeta>, StoreError> {
        match self {
            Self::Postgres(pool) => find_all_pg(pool, true).await,
            Self::Memory(store) => Ok(list_mem(store, true).await),
        }
    }

    /// Upsert by title; returns the persisted representation.
    pub async fn save(&self, document: Document) -> Result<Document, StoreError> {
        match self {
            Self::Postgres(pool) => save_pg(pool, document).await,
            Self::Memory(store) => {
                let mut state = store.write().await;
                state.documents.insert(document.title.clone(), document.clone());
                Ok(document)
            }
        }
    }

    /// Bulk delete; returns the number of rows actually removed.
    pub async fn delete_by_titles(&self, titles: &[String]) -> Result<u64, StoreError> {
        match self {
            Self::Postgres(pool) => delete_by_titles_pg(pool, titles).await,
            Self::Memory(store) => {
                let mut state = store.write().await;
                let mut deleted = 0;
                for title in titles {
                    if state.documents.remove(title).is_some() {
                        deleted += 1;
                    }
                }
                Ok(deleted)
            }
        }
    }
}

async fn list_mem(store: &RwLock<MemoryDocumentStore>, exclude_archived: bool) -> Vec<DocumentMeta> {
    let state = store.read().await;
    let mut items: Vec<DocumentMeta> = state
        .documents
        .values()
        .filter(|document| !exclude_archived || !document.archived)
        .map(DocumentMeta::from)
        .collect();
    items.sort_by(|a, b| a.title.cmp(&b.title));
    items
}

// ── Postgres implementations ───────────────────────────────────────

#[derive(sqlx::FromRow)]
struct DocumentRow {
    title: String,
    creator: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    content: Json<Vec<Tab>>,
    archived: bool,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            title: row.title,
            creator: row.creator,
            created_at: row.created_at,
            updated_at: row.updated_at,
            content: row.content.0,
            archived: row.archived,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MetaRow {
    title: String,
    creator: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    archived: bool,
}

impl From<MetaRow> for DocumentMeta {
    fn from(row: MetaRow) -> Self {
        Self {
            title: row.title,
            creator: row.creator,
            created_at: row.created_at,
            updated_at: row.updated_at,
            archived: row.archived,
        }
    }
}

async fn find_by_title_pg(pool: &PgPool, title: &str) -> Result<Option<Document>, StoreError> {
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT title, creator, created_at, updated_at, content, archived
        FROM documents
        WHERE title = $1
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Document::from))
}

async fn find_all_pg(pool: &PgPool, exclude_archived: bool) -> Result<Vec<DocumentMeta>, StoreError> {
    let rows = sqlx::query_as::<_, MetaRow>(
        r#"
        SELECT title, creator, created_at, updated_at, archived
        FROM documents
        WHERE ($1 = false OR archived = false)
        ORDER BY title
        "#,
    )
    .bind(exclude_archived)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(DocumentMeta::from).collect())
}

async fn save_pg(pool: &PgPool, document: Document) -> Result<Document, StoreError> {
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents (title, creator, created_at, updated_at, content, archived)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (title) DO UPDATE
        SET creator = EXCLUDED.creator,
            created_at = EXCLUDED.created_at,
            updated_at = EXCLUDED.updated_at,
            content = EXCLUDED.content,
            archived = EXCLUDED.archived
        RETURNING title, creator, created_at, updated_at, content, archived
        "#,
    )
    .bind(&document.title)
    .bind(&document.creator)
    .bind(document.created_at)
    .bind(document.updated_at)
    .bind(Json(&document.content))
    .bind(document.archived)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

async fn delete_by_titles_pg(pool: &PgPool, titles: &[String]) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM documents WHERE title = ANY($1)")
        .bind(titles)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use quire_common::types::{Document, Tab};

    use super::DocumentStore;

    fn document(title: &str, archived: bool) -> Document {
        Document {
            title: title.to_owned(),
            creator: Some("tester".to_owned()),
            created_at: None,
            updated_at: None,
            content: vec![Tab::titled(title)],
            archived,
        }
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let store = DocumentStore::in_memory();
        store.save(document("alpha", false)).await.expect("save should succeed");

        let found = store
            .find_by_title("alpha")
            .await
            .expect("lookup should succeed")
            .expect("document should exist");
        assert_eq!(found.title, "alpha");
        assert_eq!(found.content.len(), 1);

        let missing = store.find_by_title("beta").await.expect("lookup should succeed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn save_is_an_upsert_by_title() {
        let store = DocumentStore::in_memory();
        store.save(document("alpha", false)).await.expect("save should succeed");

        let mut replacement = document("alpha", true);
        replacement.content.push(Tab::titled("2"));
        store.save(replacement).await.expect("second save should succeed");

        let found = store
            .find_by_title("alpha")
            .await
            .expect("lookup should succeed")
            .expect("document should exist");
        assert!(found.archived);
        assert_eq!(found.content.len(), 2);
    }

    #[tokio::test]
    async fn find_all_includes_archived_documents() {
        let store = DocumentStore::in_memory();
        store.save(document("active", false)).await.expect("save should succeed");
        store.save(document("dusty", true)).await.expect("save should succeed");

        let all = store.find_all().await.expect("listing should succeed");
        assert_eq!(all.len(), 2);

        let unarchived =
            store.find_all_excluding_archived().await.expect("listing should succeed");
        assert_eq!(unarchived.len(), 1);
        assert_eq!(unarchived[0].title, "active");
    }

    #[tokio::test]
    async fn delete_by_titles_counts_only_existing_rows() {
        let store = DocumentStore::in_memory();
        store.save(document("a", false)).await.expect("save should succeed");

        let deleted = store
            .delete_by_titles(&["a".to_owned(), "b".to_owned(), "c".to_owned()])
            .await
            .expect("delete should succeed");
        assert_eq!(deleted, 1);

        let remaining = store.find_all().await.expect("listing should succeed");
        assert!(remaining.is_empty());
    }
}
