// src/api/publisher.rs
//! Publishes schemas, pages and relations through a [`NotionWorkspace`].
//!
//! Every remote call is retried with backoff when the failure is transient
//! and followed by a fixed pause. Page bodies longer than one request allows
//! are sent as a create call followed by sequential appends.

use super::NotionWorkspace;
use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_PACE_MS, NOTION_MAX_BLOCKS_PER_REQUEST, RETRY_INITIAL_DELAY_MS,
    RETRY_MAX_DELAY_MS,
};
use crate::error::{AppError, PublishError, PublishErrorKind};
use crate::error_recovery::retry_with_backoff;
use crate::model::{Block, PropertySet, PropertyValue, RelationRequest, SchemaDefinition};
use crate::types::{DatabaseId, PageId, PropertyName};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Pacing and retry behaviour of a [`Publisher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublisherSettings {
    /// Pause after every remote call.
    pub pace: Duration,
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            pace: Duration::from_millis(DEFAULT_PACE_MS),
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
        }
    }
}

impl PublisherSettings {
    /// No pause and near-instant retries, for in-memory runs.
    pub fn immediate() -> Self {
        Self {
            pace: Duration::ZERO,
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }
    }
}

pub struct Publisher {
    workspace: Arc<dyn NotionWorkspace>,
    settings: PublisherSettings,
    /// Sources recorded so far per `(target page, back-link property)`.
    back_links: Mutex<HashMap<(PageId, PropertyName), Vec<PageId>>>,
}

impl Publisher {
    pub fn new(workspace: Arc<dyn NotionWorkspace>, settings: PublisherSettings) -> Self {
        Self {
            workspace,
            settings,
            back_links: Mutex::new(HashMap::new()),
        }
    }

    pub fn workspace(&self) -> Arc<dyn NotionWorkspace> {
        Arc::clone(&self.workspace)
    }

    /// Runs one remote call with retries, then pauses.
    async fn call<T, F, Fut>(&self, operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let result = retry_with_backoff(
            operation,
            self.settings.max_attempts,
            self.settings.initial_delay,
            self.settings.max_delay,
        )
        .await;
        if !self.settings.pace.is_zero() {
            tokio::time::sleep(self.settings.pace).await;
        }
        result
    }

    /// Creates the database for `schema`, then adds its relation properties.
    pub async fn create_schema(
        &self,
        parent: &PageId,
        schema: &SchemaDefinition,
    ) -> Result<DatabaseId, PublishError> {
        let database = self
            .call(|| self.workspace.create_database(parent, schema))
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::SchemaCreation, &schema.title, e))?;
        log::info!("Created database '{}' ({})", schema.title, database);

        let relations: Vec<PropertyName> = schema.relation_properties().cloned().collect();
        if !relations.is_empty() {
            self.call(|| self.workspace.add_relation_properties(&database, &relations))
                .await
                .map_err(|e| {
                    PublishError::new(PublishErrorKind::SchemaCreation, &schema.title, e)
                })?;
            log::debug!(
                "Added {} relation propert(ies) to '{}'",
                relations.len(),
                schema.title
            );
        }
        Ok(database)
    }

    /// Checks `properties` against `schema`, creates the page with the first
    /// chunk of `blocks` and appends the rest.
    pub async fn create_page(
        &self,
        database: &DatabaseId,
        schema: &SchemaDefinition,
        properties: &PropertySet,
        blocks: &[Block],
    ) -> Result<PageId, PublishError> {
        let title = properties.title().unwrap_or_default().to_string();
        schema.validate(properties).map_err(|violation| {
            PublishError::new(PublishErrorKind::SchemaViolation, &title, violation.into())
        })?;

        let split = blocks.len().min(NOTION_MAX_BLOCKS_PER_REQUEST);
        let (first, rest) = blocks.split_at(split);
        let page = self
            .call(|| self.workspace.create_page(database, properties, first))
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::PageCreation, &title, e))?;

        if !rest.is_empty() {
            self.append_blocks(&page, rest, &title).await?;
        }
        Ok(page)
    }

    /// Appends `blocks` in order, one request per chunk. Returns the number of requests.
    pub async fn append_blocks(
        &self,
        page: &PageId,
        blocks: &[Block],
        title: &str,
    ) -> Result<usize, PublishError> {
        let mut requests = 0;
        for chunk in blocks.chunks(NOTION_MAX_BLOCKS_PER_REQUEST) {
            self.call(|| self.workspace.append_blocks(page, chunk))
                .await
                .map_err(|e| PublishError::new(PublishErrorKind::BlockAppend, title, e))?;
            requests += 1;
        }
        if requests > 0 {
            log::debug!(
                "Appended {} block(s) to '{}' in {} request(s)",
                blocks.len(),
                title,
                requests
            );
        }
        Ok(requests)
    }

    /// Writes the forward links of `source`, then each target's back-link
    /// with every source recorded for it so far.
    ///
    /// All updates are attempted. Updates that already succeeded stay in
    /// place when a later one fails; the first failure is returned.
    pub async fn link(&self, source: &PageId, requests: &[RelationRequest]) -> Result<(), PublishError> {
        let mut first_error = None;

        let mut forward: IndexMap<&PropertyName, Vec<PageId>> = IndexMap::new();
        for request in requests {
            let targets = forward.entry(&request.forward).or_default();
            if !targets.contains(&request.target) {
                targets.push(request.target.clone());
            }
        }
        if !forward.is_empty() {
            let mut properties = PropertySet::new();
            for (name, targets) in forward {
                properties.insert(name.clone(), PropertyValue::Relation(targets));
            }
            if let Err(e) = self
                .call(|| self.workspace.update_page_properties(source, &properties))
                .await
            {
                log::error!("Forward relation update on {} failed: {}", source, e);
                first_error.get_or_insert(PublishError::new(
                    PublishErrorKind::Relation,
                    source.as_str(),
                    e,
                ));
            }
        }

        for request in requests {
            let sources = {
                let mut ledger = self.back_links.lock();
                let sources = ledger
                    .entry((request.target.clone(), request.back.clone()))
                    .or_default();
                if !sources.contains(&request.source) {
                    sources.push(request.source.clone());
                }
                sources.clone()
            };
            let properties =
                PropertySet::new().with(request.back.clone(), PropertyValue::Relation(sources));
            if let Err(e) = self
                .call(|| self.workspace.update_page_properties(&request.target, &properties))
                .await
            {
                log::error!(
                    "Back-link update on {} failed; its forward link stays in place: {}",
                    request.target,
                    e
                );
                first_error.get_or_insert(PublishError::new(
                    PublishErrorKind::Relation,
                    request.target.as_str(),
                    e,
                ));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
