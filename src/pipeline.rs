// src/pipeline.rs
//! The build orchestrator: publishes each selected dataset in dependency
//! order, one record at a time.
//!
//! Per dataset: load the source file, create the database, then for every
//! record in the index window build the draft, resolve its mentions, publish
//! the page and link its relations. A bad record is skipped; a publish call
//! that still fails after retries aborts its dataset but not the run.

use crate::api::{NotionWorkspace, Publisher, Resolver};
use crate::builders::mentions::{resolve_mentions, PageLookup};
use crate::config::BuildConfig;
use crate::datasets::Dataset;
use crate::error::PublishErrorKind;
use crate::loader;
use crate::model::{PendingRelation, RelationRequest};
use crate::types::{IndexWindow, PageId};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// How a dataset's build ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    Completed,
    /// The source file could not be loaded; nothing was published.
    Skipped(String),
    /// A publish call failed after retries; later records were not attempted.
    Aborted(String),
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Aborted(reason) => write!(f, "aborted ({})", reason),
        }
    }
}

/// Counters for one dataset build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub dataset: Dataset,
    pub status: DatasetStatus,
    pub published: usize,
    /// Records that failed validation and were skipped.
    pub invalid: usize,
    /// Records whose properties the database schema would reject.
    pub rejected: usize,
    /// Distinct mention names resolved to a page, summed over records.
    pub mentions: usize,
    /// Relation targets that could not be found.
    pub unresolved_relations: usize,
    /// Pages whose relation updates failed, fully or partly.
    pub relation_failures: usize,
}

impl DatasetReport {
    fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            status: DatasetStatus::Completed,
            published: 0,
            invalid: 0,
            rejected: 0,
            mentions: 0,
            unresolved_relations: 0,
            relation_failures: 0,
        }
    }

    fn finish(mut self, status: DatasetStatus) -> Self {
        self.status = status;
        self
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub datasets: Vec<DatasetReport>,
}

impl BuildReport {
    /// False when any dataset aborted.
    pub fn is_success(&self) -> bool {
        !self
            .datasets
            .iter()
            .any(|report| matches!(report.status, DatasetStatus::Aborted(_)))
    }

    pub fn published(&self) -> usize {
        self.datasets.iter().map(|report| report.published).sum()
    }

    pub fn dataset(&self, dataset: Dataset) -> Option<&DatasetReport> {
        self.datasets.iter().find(|report| report.dataset == dataset)
    }
}

/// Drives a build against one workspace.
pub struct Pipeline {
    datasets: Vec<Dataset>,
    parent: PageId,
    window: IndexWindow,
    data_dir: PathBuf,
    publisher: Publisher,
    resolver: Resolver,
}

impl Pipeline {
    pub fn new(config: &BuildConfig, workspace: Arc<dyn NotionWorkspace>) -> Self {
        Self {
            datasets: config.datasets.clone(),
            parent: config.parent.clone(),
            window: config.window,
            data_dir: config.data_dir.clone(),
            publisher: Publisher::new(Arc::clone(&workspace), config.publisher_settings()),
            resolver: Resolver::new(workspace),
        }
    }

    /// Builds every configured dataset in order.
    pub async fn run(&self) -> BuildReport {
        let mut report = BuildReport::default();
        for dataset in &self.datasets {
            let outcome = self.build_dataset(*dataset).await;
            log::info!(
                "==== Finished {}: {} ({} published, {} invalid, {} rejected) ====",
                dataset,
                outcome.status,
                outcome.published,
                outcome.invalid,
                outcome.rejected
            );
            report.datasets.push(outcome);
        }
        log::info!(
            "Build finished: {} page(s) across {} dataset(s)",
            report.published(),
            report.datasets.len()
        );
        report
    }

    async fn build_dataset(&self, dataset: Dataset) -> DatasetReport {
        let mut report = DatasetReport::new(dataset);
        log::info!(
            "==== Building {} from {} ====",
            dataset,
            dataset.source_file()
        );

        let records = match loader::load(&self.data_dir, dataset.source_file()) {
            Ok(records) => records,
            Err(e) => {
                log::error!("Skipping {}: {}", dataset, e);
                return report.finish(DatasetStatus::Skipped(e.to_string()));
            }
        };

        let builder = dataset.builder(&self.data_dir);
        let schema = builder.schema();
        let database = match self.publisher.create_schema(&self.parent, &schema).await {
            Ok(database) => database,
            Err(e) => {
                log::error!("Aborting {}: {}", dataset, e);
                return report.finish(DatasetStatus::Aborted(e.to_string()));
            }
        };

        let selected: Vec<_> = records.iter().filter(|raw| builder.includes(raw)).collect();
        let range = self.window.bounds(selected.len());
        log::info!(
            "{} of {} record(s) belong to {}; publishing {:?}",
            selected.len(),
            records.len(),
            dataset,
            range
        );

        for index in range {
            let mut draft = match builder.draft(selected[index]) {
                Ok(draft) => draft,
                Err(e) => {
                    log::warn!("Skipping {} record {}: {}", dataset, index, e);
                    report.invalid += 1;
                    continue;
                }
            };
            log::info!(
                "Building {} -- {} -- Index -- {} --",
                dataset,
                draft.name,
                index
            );

            report.mentions += resolve_mentions(&mut draft.body.blocks, &self.resolver).await;

            let page = match self
                .publisher
                .create_page(&database, &schema, &draft.properties, &draft.body.blocks)
                .await
            {
                Ok(page) => page,
                Err(e) if e.kind == PublishErrorKind::SchemaViolation => {
                    log::warn!("Skipping {} record {}: {}", dataset, index, e);
                    report.rejected += 1;
                    continue;
                }
                Err(e) => {
                    log::error!("Aborting {} at record {}: {}", dataset, index, e);
                    return report.finish(DatasetStatus::Aborted(e.to_string()));
                }
            };
            report.published += 1;
            self.resolver.remember(&draft.name, builder.label(), &page);

            if !draft.body.relations.is_empty() {
                self.link(&page, &draft.body.relations, builder.label(), &mut report)
                    .await;
            }
        }

        report
    }

    /// Resolves relation targets within `category` and writes both directions.
    async fn link(
        &self,
        page: &PageId,
        relations: &[PendingRelation],
        category: &str,
        report: &mut DatasetReport,
    ) {
        let mut requests = Vec::with_capacity(relations.len());
        for relation in relations {
            match self
                .resolver
                .find_page(&relation.target_name, Some(category))
                .await
            {
                Some(target) => requests.push(RelationRequest {
                    source: page.clone(),
                    target,
                    forward: relation.forward.clone(),
                    back: relation.back.clone(),
                }),
                None => {
                    log::warn!(
                        "No {} page titled '{}'; '{}' link skipped",
                        category,
                        relation.target_name,
                        relation.forward
                    );
                    report.unresolved_relations += 1;
                }
            }
        }

        if requests.is_empty() {
            return;
        }
        if let Err(e) = self.publisher.link(page, &requests).await {
            log::error!("Relations of {} are incomplete: {}", page, e);
            report.relation_failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InMemoryWorkspace, WorkspaceCall};
    use crate::model::PropertyValue;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::Path;

    fn write(dir: &Path, file: &str, records: Value) {
        std::fs::write(dir.join(file), records.to_string()).unwrap();
    }

    fn config(dir: &Path, datasets: Vec<Dataset>) -> BuildConfig {
        BuildConfig {
            datasets,
            data_dir: dir.to_path_buf(),
            ..BuildConfig::default()
        }
    }

    fn gear(index: &str, name: &str, contents: &[&str]) -> Value {
        let contents: Vec<Value> = contents
            .iter()
            .map(|item| json!({"item": {"index": item.to_lowercase(), "name": item}, "quantity": 1}))
            .collect();
        json!({
            "index": index,
            "name": name,
            "equipment_category": {"index": "adventuring-gear", "name": "Adventuring Gear"},
            "cost": {"quantity": 1, "unit": "gp"},
            "contents": contents
        })
    }

    #[tokio::test]
    async fn test_missing_file_skips_only_that_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "5e-SRD-Feats.json",
            json!([{"index": "grappler", "name": "Grappler", "desc": ["You have practiced grappling."],
                    "prerequisites": [{"ability_score": {"index": "str", "name": "STR"}, "minimum_score": 13}]}]),
        );
        let workspace = Arc::new(InMemoryWorkspace::new());
        let report = Pipeline::new(
            &config(dir.path(), vec![Dataset::Spells, Dataset::Feats]),
            workspace.clone(),
        )
        .run()
        .await;

        assert!(matches!(
            report.dataset(Dataset::Spells).unwrap().status,
            DatasetStatus::Skipped(_)
        ));
        assert_eq!(report.dataset(Dataset::Feats).unwrap().published, 1);
        assert!(report.is_success());
        assert_eq!(workspace.database_titles(), vec!["Feats".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "5e-SRD-Equipment.json",
            json!([{"index": "nameless"}, gear("torch", "Torch", &[])]),
        );
        let workspace = Arc::new(InMemoryWorkspace::new());
        let report = Pipeline::new(&config(dir.path(), vec![Dataset::Items]), workspace.clone())
            .run()
            .await;

        let items = report.dataset(Dataset::Items).unwrap();
        assert_eq!(items.status, DatasetStatus::Completed);
        assert_eq!((items.published, items.invalid), (1, 1));
        assert!(workspace.page_titled("Torch").is_some());
    }

    #[tokio::test]
    async fn test_contents_link_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "5e-SRD-Equipment.json",
            json!([
                gear("torch", "Torch", &[]),
                gear("explorers-pack", "Explorer's Pack", &["Torch", "Lantern"]),
            ]),
        );
        let workspace = Arc::new(InMemoryWorkspace::new());
        let report = Pipeline::new(&config(dir.path(), vec![Dataset::Items]), workspace.clone())
            .run()
            .await;

        let items = report.dataset(Dataset::Items).unwrap();
        assert_eq!(items.published, 2);
        assert_eq!(items.unresolved_relations, 1);
        assert_eq!(items.relation_failures, 0);

        let torch = workspace.page_titled("Torch").unwrap();
        let pack = workspace.page_titled("Explorer's Pack").unwrap();
        assert_eq!(
            pack.properties.get("Contains"),
            Some(&PropertyValue::Relation(vec![torch.id.clone()]))
        );
        assert_eq!(
            torch.properties.get("Contained In"),
            Some(&PropertyValue::Relation(vec![pack.id.clone()]))
        );
    }

    #[tokio::test]
    async fn test_window_applies_after_filtering() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "5e-SRD-Equipment.json",
            json!([
                gear("torch", "Torch", &[]),
                {"index": "club", "name": "Club", "equipment_category": {"index": "weapon", "name": "Weapon"},
                 "weapon_category": "Simple", "category_range": "Simple Melee",
                 "cost": {"quantity": 1, "unit": "sp"},
                 "damage": {"damage_dice": "1d4", "damage_type": {"index": "bludgeoning", "name": "Bludgeoning"}},
                 "range": {"normal": 5}, "weight": 2,
                 "properties": [{"index": "light", "name": "Light"}]},
                gear("rope", "Rope", &[]),
            ]),
        );
        let workspace = Arc::new(InMemoryWorkspace::new());
        let config = BuildConfig {
            window: IndexWindow::new(1, Some(2)).unwrap(),
            ..config(dir.path(), vec![Dataset::Items])
        };
        Pipeline::new(&config, workspace.clone()).run().await;

        let titles: Vec<String> = workspace
            .pages()
            .iter()
            .map(|page| page.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Rope".to_string()]);
        assert!(workspace
            .calls()
            .iter()
            .all(|call| !matches!(call, WorkspaceCall::AddRelations { count: 0, .. })));
    }
}
