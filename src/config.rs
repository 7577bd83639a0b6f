// src/config.rs
use crate::api::PublisherSettings;
use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_DATA_DIR, DEFAULT_LOG_DIR, DEFAULT_MAX_RETRIES, DEFAULT_PACE_MS,
};
use crate::datasets::{self, Dataset};
use crate::error::AppError;
use crate::types::{ApiKey, IndexWindow, PageId};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input, before validation.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Datasets to build (e.g. "weapons spells"), or "all"
    #[arg(short = 'b', long, num_args = 1.., required = true)]
    pub build: Vec<String>,

    /// Notion page (ID or URL) the databases are created under
    #[arg(short = 'd', long = "database_id")]
    pub database_id: String,

    /// Notion integration token (falls back to NOTION_API_KEY)
    #[arg(short = 'k', long = "auth_key")]
    pub auth_key: Option<String>,

    /// First record index to publish
    #[arg(short = 's', long = "start_range", default_value_t = 0)]
    pub start_range: usize,

    /// Record index to stop before (defaults to the end of each dataset)
    #[arg(short = 'e', long = "end_range")]
    pub end_range: Option<usize>,

    /// Directory holding the 5e-SRD-*.json files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory run logs are written to
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Pause after every Notion call, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PACE_MS)]
    pub pace_ms: u64,

    /// Attempts per Notion call before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Publish into an in-memory workspace instead of Notion
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved build configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Selected datasets in dependency order.
    pub datasets: Vec<Dataset>,
    pub parent: PageId,
    pub api_key: ApiKey,
    pub window: IndexWindow,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub pace: Duration,
    pub max_retries: u32,
    pub dry_run: bool,
    pub verbose: bool,
}

impl BuildConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let env_key = std::env::var(API_KEY_ENV_VAR).ok();
        Self::resolve_with(cli, env_key)
    }

    /// Like [`BuildConfig::resolve`], with the environment's API key passed in.
    pub fn resolve_with(cli: CommandLineInput, env_key: Option<String>) -> Result<Self, AppError> {
        let selection = datasets::parse_selection(&cli.build)?;
        let parent = PageId::parse(&cli.database_id)?;
        let window = IndexWindow::new(cli.start_range, cli.end_range)?;

        let api_key = match cli.auth_key.or(env_key) {
            Some(key) => ApiKey::new(key)?,
            None if cli.dry_run => ApiKey::dry_run(),
            None => {
                return Err(AppError::MissingConfiguration(format!(
                    "--auth_key not given and {} is not set",
                    API_KEY_ENV_VAR
                )))
            }
        };

        if cli.max_retries == 0 {
            return Err(AppError::MissingConfiguration(
                "--max-retries must be at least 1".to_string(),
            ));
        }

        Ok(BuildConfig {
            datasets: datasets::build_order(&selection),
            parent,
            api_key,
            window,
            data_dir: cli.data_dir,
            log_dir: cli.log_dir,
            pace: Duration::from_millis(cli.pace_ms),
            max_retries: cli.max_retries,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    pub fn publisher_settings(&self) -> PublisherSettings {
        PublisherSettings {
            pace: self.pace,
            max_attempts: self.max_retries,
            ..PublisherSettings::default()
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            datasets: Dataset::ALL.to_vec(),
            parent: Self::example_parent(),
            api_key: ApiKey::dry_run(),
            window: IndexWindow::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            pace: Duration::ZERO,
            max_retries: DEFAULT_MAX_RETRIES,
            dry_run: true,
            verbose: false,
        }
    }
}

impl BuildConfig {
    /// A valid parent id for tests and defaults.
    fn example_parent() -> PageId {
        PageId::parse("12345678123456781234567812345678")
            .unwrap_or_else(|_| PageId::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use pretty_assertions::assert_eq;

    const PARENT: &str = "550e8400e29b41d4a716446655440000";
    const KEY: &str = "secret_abcdefghijklmnopqrs";

    fn parse(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["srd2notion"];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_original_flag_names_are_accepted() {
        let cli = parse(&[
            "--build", "spells", "weapons", "--database_id", PARENT, "--auth_key", KEY,
            "--start_range", "2", "--end_range", "5",
        ]);
        assert_eq!(cli.build, vec!["spells", "weapons"]);
        assert_eq!(cli.start_range, 2);
        assert_eq!(cli.end_range, Some(5));

        let config = BuildConfig::resolve_with(cli, None).unwrap();
        assert_eq!(config.datasets, vec![Dataset::Weapons, Dataset::Spells]);
        assert_eq!(config.window.bounds(10), 2..5);
        assert_eq!(config.pace, Duration::from_millis(DEFAULT_PACE_MS));
    }

    #[test]
    fn test_build_is_required() {
        assert!(CommandLineInput::try_parse_from(["srd2notion", "-d", PARENT]).is_err());
    }

    #[test]
    fn test_all_with_others_is_rejected() {
        let cli = parse(&["-b", "all", "spells", "-d", PARENT, "-k", KEY]);
        assert!(matches!(
            BuildConfig::resolve_with(cli, None),
            Err(AppError::ValidationError(ValidationError::InvalidSelection(_)))
        ));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let cli = parse(&["-b", "feats", "-d", PARENT, "-k", KEY, "-s", "4", "-e", "1"]);
        assert!(matches!(
            BuildConfig::resolve_with(cli, None),
            Err(AppError::ValidationError(ValidationError::InvalidRange { start: 4, end: 1 }))
        ));
    }

    #[test]
    fn test_key_comes_from_flag_then_environment() {
        let cli = parse(&["-b", "feats", "-d", PARENT]);
        assert!(matches!(
            BuildConfig::resolve_with(cli.clone(), None),
            Err(AppError::MissingConfiguration(_))
        ));
        let config = BuildConfig::resolve_with(cli, Some(KEY.to_string())).unwrap();
        assert_eq!(config.api_key.as_str(), KEY);

        let bad = parse(&["-b", "feats", "-d", PARENT, "-k", "not-a-key"]);
        assert!(BuildConfig::resolve_with(bad, None).is_err());
    }

    #[test]
    fn test_dry_run_needs_no_key() {
        let cli = parse(&["-b", "all", "-d", PARENT, "--dry-run", "--pace-ms", "0"]);
        let config = BuildConfig::resolve_with(cli, None).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.datasets.len(), 20);
        assert_eq!(config.publisher_settings().pace, Duration::ZERO);
    }

    #[test]
    fn test_parent_accepts_urls() {
        let url = format!("https://www.notion.so/workspace/SRD-{}", PARENT);
        let cli = parse(&["-b", "feats", "-d", &url, "-k", KEY]);
        let config = BuildConfig::resolve_with(cli, None).unwrap();
        assert_eq!(config.parent.as_str(), PARENT);

        let cli = parse(&["-b", "feats", "-d", "nope", "-k", KEY]);
        assert!(BuildConfig::resolve_with(cli, None).is_err());
    }
}
