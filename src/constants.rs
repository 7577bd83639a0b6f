// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how the
//! publisher talks to Notion: how much it sends per call, how long it
//! waits between calls, and how it tags what it creates.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Maximum number of child blocks Notion accepts in one create or append call.
pub const NOTION_MAX_BLOCKS_PER_REQUEST: usize = 100;

/// Maximum characters in a single rich text object.
///
/// Longer content is split into consecutive text objects.
pub const NOTION_MAX_TEXT_LENGTH: usize = 2000;

/// Results requested per search call. The Notion API maximum is 100.
pub const NOTION_SEARCH_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Pacing and retries
// ---------------------------------------------------------------------------

/// Default pause after every publish call, in milliseconds.
///
/// Notion averages three requests per second per integration; a flat
/// half-second pause keeps a sequential run comfortably below that.
pub const DEFAULT_PACE_MS: u64 = 500;

/// Default number of attempts for a retryable publish call.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// First backoff delay after a retryable failure, in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;

/// Upper bound on the backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 16_000;

// ---------------------------------------------------------------------------
// Workspace conventions
// ---------------------------------------------------------------------------

/// Select property carried by every database and page; the resolver filters on it.
pub const CATEGORY_PROPERTY: &str = "5E Category";

/// Title property of every database.
pub const NAME_PROPERTY: &str = "Name";

/// Environment variable consulted when `--auth_key` is not given.
pub const API_KEY_ENV_VAR: &str = "NOTION_API_KEY";

/// Default directory holding the SRD JSON files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory for run logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
