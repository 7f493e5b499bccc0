use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use file_flatten::config::{resolve_extensions, ENV_DEST_DIR, ENV_SOURCE_DIR};
use file_flatten::logging::initialize_logging;
use file_flatten::utils::copy_file_with_metadata;
use file_flatten::{flatten_with, AppConfig, EnvSettings, FlattenConfig, FlattenEvent, RunResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> Result<ExitCode> {
    let matches = build_cli().get_matches();

    // .env must be loaded before LOG_FILE and friends are read
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let env_settings = EnvSettings::from_env();

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());
    let log_file = matches
        .get_one::<PathBuf>("log-file")
        .cloned()
        .or_else(|| env_settings.log_file.clone());

    initialize_logging(&log_level, log_file.as_deref())?;

    if !dotenv_loaded {
        debug!("No .env file found, using system environment variables");
    }

    let config = match create_app_config(&matches, env_settings, log_level, log_file) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return Ok(ExitCode::from(1));
        }
    };

    run_application(config)
}

fn build_cli() -> Command {
    Command::new("file-flatten")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy matching files from a directory tree into one flat directory")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Directory to scan (falls back to SOURCE_DIR)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dest")
                .value_name("DEST")
                .help("Directory to copy into, created if missing (falls back to DEST_DIR)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .value_name("EXT")
                .help("Target extension, repeatable or comma-separated (overrides TARGET_EXTENSIONS)")
                .action(ArgAction::Append)
                .value_delimiter(','),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Also write log output to this file (overrides LOG_FILE)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Do not draw a progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the run result as JSON on stdout")
                .action(ArgAction::SetTrue),
        )
}

/// Merge CLI arguments with environment settings; CLI values win.
fn create_app_config(
    matches: &ArgMatches,
    env_settings: EnvSettings,
    log_level: String,
    log_file: Option<PathBuf>,
) -> Result<AppConfig> {
    let source_dir = matches
        .get_one::<PathBuf>("source")
        .cloned()
        .or(env_settings.source_dir)
        .with_context(|| format!("No source directory given (pass SOURCE or set {ENV_SOURCE_DIR})"))?;

    let dest_dir = matches
        .get_one::<PathBuf>("dest")
        .cloned()
        .or(env_settings.dest_dir)
        .with_context(|| format!("No destination directory given (pass DEST or set {ENV_DEST_DIR})"))?;

    let cli_extensions: Vec<String> = matches
        .get_many::<String>("ext")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let extensions = resolve_extensions(&cli_extensions, env_settings.target_extensions.as_deref());

    Ok(AppConfig {
        flatten: FlattenConfig::new(source_dir, dest_dir).with_extensions(extensions),
        log_level,
        log_file,
        show_progress: !matches.get_flag("no-progress"),
        json_summary: matches.get_flag("json"),
    })
}

fn run_application(config: AppConfig) -> Result<ExitCode> {
    info!(
        "Flattening {} -> {} ({})",
        config.flatten.source_dir.display(),
        config.flatten.dest_dir.display(),
        config.flatten.extensions
    );
    debug!("Configuration: {:#?}", config);

    let progress = create_progress_bar(config.show_progress);
    let outcome = flatten_with(&config.flatten, copy_file_with_metadata, |event| match event {
        FlattenEvent::ScanComplete { total } => progress.set_length(total as u64),
        FlattenEvent::FileProcessed { .. } => progress.inc(1),
    });
    progress.finish_and_clear();

    // Fatal errors are already logged by the flattener
    let Ok(result) = outcome else {
        return Ok(ExitCode::from(1));
    };

    print_failure_report(&result);

    if config.json_summary {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize run result")?;
        println!("{json}");
    }

    if result.has_failures() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn create_progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} files ({percent}%)")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("Processing");
    bar
}

fn print_failure_report(result: &RunResult) {
    if result.failures.is_empty() {
        return;
    }

    error!("Copy errors encountered:");
    for failure in &result.failures {
        error!("  {}: {}", failure.source.display(), failure.error);
    }
    info!("Success rate: {:.2}%", result.success_rate() * 100.0);
}
