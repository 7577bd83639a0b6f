// src/api/resolver.rs
//! Finds published pages by title for mentions and relations.
//!
//! Lookups search the workspace and keep every hit in a local index, so a
//! name is searched for at most once per run once it has been found. Pages
//! the run creates itself are added to the index directly.

use super::NotionWorkspace;
use crate::builders::mentions::PageLookup;
use crate::error::AppError;
use crate::types::PageId;
use dashmap::DashMap;
use std::sync::Arc;

type IndexKey = (String, Option<String>);

pub struct Resolver {
    workspace: Arc<dyn NotionWorkspace>,
    index: DashMap<IndexKey, PageId>,
}

impl Resolver {
    pub fn new(workspace: Arc<dyn NotionWorkspace>) -> Self {
        Self {
            workspace,
            index: DashMap::new(),
        }
    }

    fn key(name: &str, category: Option<&str>) -> IndexKey {
        (name.to_lowercase(), category.map(str::to_string))
    }

    /// Records a page created during this run. An earlier entry for the same
    /// name is kept.
    pub fn remember(&self, name: &str, category: &str, page: &PageId) {
        self.index
            .entry(Self::key(name, Some(category)))
            .or_insert_with(|| page.clone());
        self.index
            .entry(Self::key(name, None))
            .or_insert_with(|| page.clone());
    }

    /// Pages through search results until a title matches.
    async fn search(&self, name: &str, category: Option<&str>) -> Result<Option<PageId>, AppError> {
        let wanted = name.to_lowercase();
        let mut cursor: Option<String> = None;
        loop {
            let results = self
                .workspace
                .search_pages(name, cursor.as_deref())
                .await?;
            let found = results.pages.iter().find(|page| {
                page.title.to_lowercase() == wanted
                    && category.map_or(true, |c| page.category.as_deref() == Some(c))
            });
            if let Some(page) = found {
                return Ok(Some(page.id.clone()));
            }
            match results.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }
}

#[async_trait::async_trait]
impl PageLookup for Resolver {
    async fn find_page(&self, name: &str, category: Option<&str>) -> Option<PageId> {
        let key = Self::key(name, category);
        if let Some(hit) = self.index.get(&key).map(|entry| entry.value().clone()) {
            return Some(hit);
        }

        match self.search(name, category).await {
            Ok(Some(page)) => {
                self.index.insert(key, page.clone());
                Some(page)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Lookup of '{}' failed, leaving it as text: {}", name, e);
                None
            }
        }
    }
}
