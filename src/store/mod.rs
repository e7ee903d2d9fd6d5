//! Content persistence.
//!
//! [`ContentStore`] is the seam between handlers and storage. Every query
//! binds its parameters, and every mutation spanning more than one statement
//! runs inside a single transaction.

mod memory;
mod postgres;
pub mod schema;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::content::{NewPage, NewSection, OrderingError, Page, Section, User};

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] bb8::RunError<tokio_postgres::Error>),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error(transparent)]
    InvalidOrder(#[from] OrderingError),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All pages by ascending `sort_order`.
    async fn list_pages(&self) -> StoreResult<Vec<Page>>;

    async fn find_page(&self, id: i32) -> StoreResult<Option<Page>>;

    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>>;

    /// Insert a page at the end of the navigation order.
    ///
    /// Fails with [`StoreError::Duplicate`] when the slug is taken.
    async fn create_page(&self, page: NewPage) -> StoreResult<Page>;

    /// Delete a page together with all of its sections.
    ///
    /// Returns `false` when no page had that id.
    async fn delete_page(&self, id: i32) -> StoreResult<bool>;

    /// Set each listed page's `sort_order` to its index, atomically.
    ///
    /// The list is checked against the pages present when the write happens;
    /// unless it names each of them exactly once nothing is written and
    /// [`StoreError::InvalidOrder`] is returned.
    async fn set_page_order(&self, ordered_ids: &[i32]) -> StoreResult<()>;

    /// Sections of a page by ascending `order`.
    async fn list_sections(&self, page_id: i32) -> StoreResult<Vec<Section>>;

    async fn max_section_order(&self, page_id: i32) -> StoreResult<Option<i32>>;

    /// Append a section to its page, assigning `order = max + 1`.
    ///
    /// Concurrent calls for the same page must never hand out the same order.
    async fn create_section(&self, section: NewSection) -> StoreResult<Section>;

    /// Replace a section's payload. Returns `false` when the section is absent.
    async fn update_section_data(&self, id: i32, data: Value) -> StoreResult<bool>;

    async fn delete_section(&self, id: i32) -> StoreResult<bool>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}
