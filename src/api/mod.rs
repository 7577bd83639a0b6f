// src/api/mod.rs
//! Notion API interaction: the ability to publish into a workspace.
//!
//! Business logic depends on [`NotionWorkspace`], never on HTTP details.
//! [`NotionHttpClient`] talks to the real API; [`InMemoryWorkspace`] backs
//! dry runs and tests. [`Publisher`] and [`Resolver`] sit on top of either.

mod client;
mod dry_run;
pub mod payload;
mod publisher;
mod resolver;
mod responses;

use crate::error::AppError;
use crate::model::{Block, PropertySet, SchemaDefinition};
use crate::types::{DatabaseId, PageId, PropertyName};

/// A page as seen through search: enough to match it by title and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
    pub category: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub pages: Vec<PageSummary>,
    /// Present when more results follow.
    pub next_cursor: Option<String>,
}

/// The remote calls the publisher needs.
#[async_trait::async_trait]
pub trait NotionWorkspace: Send + Sync {
    /// Creates a database for `schema` under the parent page. Relation
    /// properties are not part of this call.
    async fn create_database(
        &self,
        parent: &PageId,
        schema: &SchemaDefinition,
    ) -> Result<DatabaseId, AppError>;

    /// Adds relation properties pointing back at the same database.
    async fn add_relation_properties(
        &self,
        database: &DatabaseId,
        names: &[PropertyName],
    ) -> Result<(), AppError>;

    /// Creates a page with at most one request's worth of body blocks.
    async fn create_page(
        &self,
        database: &DatabaseId,
        properties: &PropertySet,
        children: &[Block],
    ) -> Result<PageId, AppError>;

    async fn append_blocks(&self, page: &PageId, children: &[Block]) -> Result<(), AppError>;

    /// Title search over pages.
    async fn search_pages(&self, query: &str, cursor: Option<&str>)
        -> Result<SearchPage, AppError>;

    async fn update_page_properties(
        &self,
        page: &PageId,
        properties: &PropertySet,
    ) -> Result<(), AppError>;
}

pub use client::NotionHttpClient;
pub use dry_run::{InMemoryWorkspace, StoredPage, WorkspaceCall};
pub use publisher::{Publisher, PublisherSettings};
pub use resolver::Resolver;
