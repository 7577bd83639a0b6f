// src/api/dry_run.rs
//! An in-memory workspace for dry runs and tests.
//!
//! Assigns fresh ids to everything it creates, keeps pages with their
//! properties and blocks, and answers title searches from what was created
//! during the run.

use super::{NotionWorkspace, PageSummary, SearchPage};
use crate::constants::CATEGORY_PROPERTY;
use crate::error::AppError;
use crate::model::{Block, PropertySet, PropertyValue, SchemaDefinition};
use crate::types::{DatabaseId, PageId, PropertyName};
use parking_lot::Mutex;

/// A page held by the in-memory workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPage {
    pub id: PageId,
    pub database: DatabaseId,
    pub properties: PropertySet,
    pub blocks: Vec<Block>,
}

impl StoredPage {
    pub fn title(&self) -> &str {
        self.properties.title().unwrap_or_default()
    }

    fn summary(&self) -> PageSummary {
        let category = match self.properties.get(CATEGORY_PROPERTY) {
            Some(PropertyValue::Select(option)) => option.clone(),
            _ => None,
        };
        PageSummary {
            id: self.id.clone(),
            title: self.title().to_string(),
            category,
        }
    }
}

/// One call received by the workspace, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCall {
    CreateDatabase { title: String },
    AddRelations { database: DatabaseId, count: usize },
    CreatePage { title: String, blocks: usize },
    AppendBlocks { page: PageId, blocks: usize },
    Search { query: String },
    UpdatePage { page: PageId },
}

#[derive(Debug, Default)]
struct WorkspaceState {
    databases: Vec<(DatabaseId, SchemaDefinition)>,
    pages: Vec<StoredPage>,
    calls: Vec<WorkspaceCall>,
}

#[derive(Debug, Default)]
pub struct InMemoryWorkspace {
    state: Mutex<WorkspaceState>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> Vec<StoredPage> {
        self.state.lock().pages.clone()
    }

    /// The first page titled `title`.
    pub fn page_titled(&self, title: &str) -> Option<StoredPage> {
        self.state
            .lock()
            .pages
            .iter()
            .find(|p| p.title() == title)
            .cloned()
    }

    /// Titles of the databases created so far, in creation order.
    pub fn database_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .databases
            .iter()
            .map(|(_, schema)| schema.title.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<WorkspaceCall> {
        self.state.lock().calls.clone()
    }

    fn missing(what: &str, id: &str) -> AppError {
        AppError::InternalError {
            message: format!("Dry-run workspace has no {} {}", what, id),
            source: None,
        }
    }
}

#[async_trait::async_trait]
impl NotionWorkspace for InMemoryWorkspace {
    async fn create_database(
        &self,
        parent: &PageId,
        schema: &SchemaDefinition,
    ) -> Result<DatabaseId, AppError> {
        let id = DatabaseId::new_v4();
        log::debug!("[dry-run] create database '{}' under {}", schema.title, parent);
        let mut state = self.state.lock();
        state.calls.push(WorkspaceCall::CreateDatabase {
            title: schema.title.clone(),
        });
        state.databases.push((id.clone(), schema.clone()));
        Ok(id)
    }

    async fn add_relation_properties(
        &self,
        database: &DatabaseId,
        names: &[PropertyName],
    ) -> Result<(), AppError> {
        log::debug!("[dry-run] add {} relation(s) to {}", names.len(), database);
        let mut state = self.state.lock();
        if !state.databases.iter().any(|(id, _)| id == database) {
            return Err(Self::missing("database", database.as_str()));
        }
        state.calls.push(WorkspaceCall::AddRelations {
            database: database.clone(),
            count: names.len(),
        });
        Ok(())
    }

    async fn create_page(
        &self,
        database: &DatabaseId,
        properties: &PropertySet,
        children: &[Block],
    ) -> Result<PageId, AppError> {
        let id = PageId::new_v4();
        let page = StoredPage {
            id: id.clone(),
            database: database.clone(),
            properties: properties.clone(),
            blocks: children.to_vec(),
        };
        log::debug!(
            "[dry-run] create page '{}' with {} block(s)",
            page.title(),
            children.len()
        );
        let mut state = self.state.lock();
        if !state.databases.iter().any(|(id, _)| id == database) {
            return Err(Self::missing("database", database.as_str()));
        }
        state.calls.push(WorkspaceCall::CreatePage {
            title: page.title().to_string(),
            blocks: children.len(),
        });
        state.pages.push(page);
        Ok(id)
    }

    async fn append_blocks(&self, page: &PageId, children: &[Block]) -> Result<(), AppError> {
        log::debug!("[dry-run] append {} block(s) to {}", children.len(), page);
        let mut state = self.state.lock();
        let stored = state
            .pages
            .iter_mut()
            .find(|p| &p.id == page)
            .ok_or_else(|| Self::missing("page", page.as_str()))?;
        stored.blocks.extend_from_slice(children);
        state.calls.push(WorkspaceCall::AppendBlocks {
            page: page.clone(),
            blocks: children.len(),
        });
        Ok(())
    }

    async fn search_pages(
        &self,
        query: &str,
        _cursor: Option<&str>,
    ) -> Result<SearchPage, AppError> {
        let needle = query.to_lowercase();
        let mut state = self.state.lock();
        state.calls.push(WorkspaceCall::Search {
            query: query.to_string(),
        });
        let pages = state
            .pages
            .iter()
            .filter(|p| p.title().to_lowercase().contains(&needle))
            .map(StoredPage::summary)
            .collect();
        Ok(SearchPage {
            pages,
            next_cursor: None,
        })
    }

    async fn update_page_properties(
        &self,
        page: &PageId,
        properties: &PropertySet,
    ) -> Result<(), AppError> {
        log::debug!("[dry-run] update {} propert(ies) on {}", properties.len(), page);
        let mut state = self.state.lock();
        let stored = state
            .pages
            .iter_mut()
            .find(|p| &p.id == page)
            .ok_or_else(|| Self::missing("page", page.as_str()))?;
        for (name, value) in properties.iter() {
            stored.properties.insert(name.clone(), value.clone());
        }
        state.calls.push(WorkspaceCall::UpdatePage { page: page.clone() });
        Ok(())
    }
}
