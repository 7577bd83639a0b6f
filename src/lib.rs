// src/lib.rs
//! srd2notion library: publishes the D&D 5E SRD JSON corpus into Notion databases.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `LoadError`, `PublishError`, `SchemaViolation`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `BuildConfig`
//! - **Datasets**: `Dataset`, `build_order`
//! - **Domain model**: `SchemaDefinition`, `PropertySet`, `Block`, `RichText`, `PageDraft`
//! - **Remote workspace**: `NotionWorkspace`, `NotionHttpClient`, `InMemoryWorkspace`, `Publisher`, `Resolver`
//! - **Orchestration**: `Pipeline`, `BuildReport`

pub mod api;
pub mod builders;
pub mod config;
pub mod constants;
pub mod datasets;
pub mod error;
mod error_recovery;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod records;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, LoadError, PublishError, PublishErrorKind, SchemaViolation};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{BuildConfig, CommandLineInput};

// --- Datasets ---
pub use crate::datasets::{build_order, parse_selection, Dataset};

// --- Domain Model ---
pub use crate::model::{
    Block, PageBody, PageDraft, PropertyKind, PropertySet, PropertyValue, RichText,
    SchemaDefinition,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, DatabaseId, IndexWindow, PageId, PropertyName};

// --- Remote Workspace ---
pub use crate::api::{
    InMemoryWorkspace, NotionHttpClient, NotionWorkspace, Publisher, PublisherSettings, Resolver,
};

// --- Orchestration ---
pub use crate::builders::{PageBuilder, RecordBuilder};
pub use crate::pipeline::{BuildReport, DatasetReport, DatasetStatus, Pipeline};
