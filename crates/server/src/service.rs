// Document Service.
//
// Orchestrates reads and writes of documents, tabs and blocks: locate by
// document title + tab index + block id, apply the update policy, run text
// through the content filter, and persist the whole document back.
//
// Every mutation is a whole-document read-modify-write; there is no
// field-level update at the store level.

use chrono::Utc;
use quire_common::types::{Block, BlockUpdateRequest, Document, DocumentMeta, Tab};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::filter::{ContentFilter, FilterError};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("document not found")]
    NotFound,
    #[error("document title already exists")]
    DuplicateTitle,
    #[error("tab index {0} does not address an existing tab")]
    IndexOutOfRange(usize),
    #[error("block update rejected: {0}")]
    RejectedUpdate(&'static str),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct DocumentService {
    store: DocumentStore,
    filter: ContentFilter,
}

impl DocumentService {
    pub fn new(store: DocumentStore, filter: ContentFilter) -> Self {
        Self { store, filter }
    }

    /// Every document's list projection, archived ones included.
    ///
    /// The store also offers an archived-excluding variant; it is not wired
    /// here, so archived documents keep showing up in listings.
    pub async fn list_documents(&self) -> Result<Vec<DocumentMeta>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_document(&self, title: &str) -> Result<Option<Document>, ServiceError> {
        Ok(self.store.find_by_title(title).await?)
    }

    /// Creates a document, seeded with one tab titled as the document.
    ///
    /// Any tabs supplied in the payload are discarded. Client-supplied
    /// creator/createdAt/archived are persisted as-is.
    pub async fn create_document(&self, mut document: Document) -> Result<Document, ServiceError> {
        if self.store.find_by_title(&document.title).await?.is_some() {
            return Err(ServiceError::DuplicateTitle);
        }

        document.content = vec![Tab::titled(&document.title)];
        let saved = self.store.save(document).await?;
        info!(title = %saved.title, "document created");
        Ok(saved)
    }

    /// Bulk delete. Returns the request size, not the rows actually
    /// removed — callers cannot assume every named title existed.
    pub async fn delete_documents(&self, titles: &[String]) -> Result<usize, ServiceError> {
        let deleted = self.store.delete_by_titles(titles).await?;
        info!(requested = titles.len(), deleted, "documents deleted");
        Ok(titles.len())
    }

    /// Appends a freshly authored block to the tab at `tab_index`.
    ///
    /// The text is filtered before the block is built; a filter response
    /// without a payload leaves the block content null.
    pub async fn append_block(
        &self,
        title: &str,
        tab_index: usize,
        text: &str,
        author: &str,
        is_code: bool,
    ) -> Result<Document, ServiceError> {
        let mut document =
            self.store.find_by_title(title).await?.ok_or(ServiceError::NotFound)?;

        let content = self.filter.filter(text).await?;

        let block = Block {
            id: Uuid::new_v4().to_string(),
            content,
            creator: Some(author.to_owned()),
            created_at: Some(Utc::now()),
            code: is_code,
            updated_at: None,
            updated_by: None,
        };

        let tab = document
            .content
            .get_mut(tab_index)
            .ok_or(ServiceError::IndexOutOfRange(tab_index))?;
        tab.text_blocks.push(block);

        document.updated_at = Some(Utc::now());
        let saved = self.store.save(document).await?;
        info!(title = %saved.title, tab_index, author, "block appended");
        Ok(saved)
    }

    /// First block with a matching id in the addressed tab.
    ///
    /// An out-of-range tab index is treated the same as an unknown block id.
    pub async fn get_block(
        &self,
        title: &str,
        tab_index: usize,
        block_id: &str,
    ) -> Result<Option<Block>, ServiceError> {
        let document = self.store.find_by_title(title).await?.ok_or(ServiceError::NotFound)?;

        Ok(find_block(&document, tab_index, block_id).cloned())
    }

    /// Applies the block update policy.
    ///
    /// A missing document or block is an idempotent no-op (`Ok(None)`), not
    /// an error. The update is rejected when the filtered content equals the
    /// existing content, or when no username was supplied — a genuine edit
    /// without an author is rejected rather than applied anonymously.
    pub async fn update_block(
        &self,
        title: &str,
        tab_index: usize,
        block_id: &str,
        request: BlockUpdateRequest,
    ) -> Result<Option<Block>, ServiceError> {
        let Some(mut document) = self.store.find_by_title(title).await? else {
            return Ok(None);
        };

        if find_block(&document, tab_index, block_id).is_none() {
            return Ok(None);
        }

        let new_content = self.filter.filter(&request.content).await?;

        let Some(block) = find_block_mut(&mut document, tab_index, block_id) else {
            return Ok(None);
        };

        if new_content == block.content {
            warn!(title, block_id, "block update rejected: content unchanged");
            return Err(ServiceError::RejectedUpdate("content unchanged after filtering"));
        }
        if request.username.trim().is_empty() {
            warn!(title, block_id, "block update rejected: no username");
            return Err(ServiceError::RejectedUpdate("username must not be blank"));
        }

        block.content = new_content;
        block.updated_at = Some(Utc::now());
        block.updated_by = Some(request.username.clone());
        let updated = block.clone();

        self.store.save(document).await?;
        info!(title, block_id, updated_by = %request.username, "block updated");
        Ok(Some(updated))
    }

    /// Appends a tab. A blank-titled tab is named after its 1-based
    /// position — taken from the final list length, after appending.
    pub async fn add_tab(&self, title: &str, mut tab: Tab) -> Result<Tab, ServiceError> {
        let mut document =
            self.store.find_by_title(title).await?.ok_or(ServiceError::NotFound)?;

        if tab.title.trim().is_empty() {
            tab.title = (document.content.len() + 1).to_string();
        }
        document.content.push(tab.clone());

        self.store.save(document).await?;
        info!(title, tab_title = %tab.title, "tab added");
        Ok(tab)
    }
}

fn find_block<'a>(document: &'a Document, tab_index: usize, block_id: &str) -> Option<&'a Block> {
    document
        .content
        .get(tab_index)?
        .text_blocks
        .iter()
        .find(|block| block.id == block_id)
}

fn find_block_mut<'a>(
    document: &'a mut Document,
    tab_index: usize,
    block_id: &str,
) -> Option<&'a mut Block> {
    document
        .content
        .get_mut(tab_index)?
        .text_blocks
        .iter_mut()
        .find(|block| block.id == block_id)
}

// ── Tests ──────────────────────────────────────────────────────────
