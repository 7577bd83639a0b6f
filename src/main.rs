// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use srd2notion::{
    BuildConfig, CommandLineInput, InMemoryWorkspace, NotionHttpClient, NotionWorkspace, Pipeline,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging: console plus a timestamped file under `log_dir`.
fn setup_logging(verbose: bool, log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fs::create_dir_all(log_dir)?;
    let log_file_path = log_dir.join(format!(
        "{}-srd2notion.log",
        chrono::Local::now().format("%Y-%m-%d.%H.%M.%S")
    ));

    let pattern = "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}";

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn log_run_banner(config: &BuildConfig) {
    let selection: Vec<&str> = config.datasets.iter().map(|d| d.selector()).collect();
    log::info!("==================================================");
    log::info!("srd2notion {}", env!("CARGO_PKG_VERSION"));
    log::info!("Database ID: {}", config.parent);
    log::info!("Authentication Key: {}", config.api_key);
    log::info!("Build Database: {}", selection.join(", "));
    log::info!("Start Range: {}", config.window.start());
    match config.window.end() {
        Some(end) => log::info!("End Range: {}", end),
        None => log::info!("End Range: end of dataset"),
    }
    if config.dry_run {
        log::info!("Dry run: publishing into an in-memory workspace");
    }
    log::info!("==================================================");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose, &cli.log_dir)?;

    let config = BuildConfig::resolve(cli)?;
    log_run_banner(&config);

    let workspace: Arc<dyn NotionWorkspace> = if config.dry_run {
        Arc::new(InMemoryWorkspace::new())
    } else {
        Arc::new(NotionHttpClient::new(&config.api_key)?)
    };

    let report = Pipeline::new(&config, workspace).run().await;

    for dataset in &report.datasets {
        println!(
            "{:<18} {:>4} published  {}",
            dataset.dataset.selector(),
            dataset.published,
            dataset.status
        );
    }

    if !report.is_success() {
        log::error!("One or more datasets aborted; see the log for details");
        std::process::exit(1);
    }

    Ok(())
}
