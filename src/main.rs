// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use potrad::app_config::{self, Config, FailedEntryPolicy};
use potrad::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FailedEntryPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFailedEntries {
    /// Leave failed entries out of the output
    Omit,
    /// Write failed entries with an <ERROR> translation
    Placeholder,
}

impl From<CliFailedEntries> for FailedEntryPolicy {
    fn from(cli_policy: CliFailedEntries) -> Self {
        match cli_policy {
            CliFailedEntries::Omit => FailedEntryPolicy::Omit,
            CliFailedEntries::Placeholder => FailedEntryPolicy::Placeholder,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a catalog (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for potrad
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Catalog to translate
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output report file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// URL of the translate endpoint
    #[arg(short, long, env = "POTRAD_URL")]
    url: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Keep translating after a failed entry
    #[arg(long)]
    continue_on_error: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path
    #[arg(short, long, default_value = "potrad.json")]
    config: PathBuf,

    /// How failed entries appear in the output
    #[arg(long, value_enum)]
    failed_entries: Option<CliFailedEntries>,

    /// Disable the progress bar and progress log lines
    #[arg(long)]
    no_progress: bool,
}

/// potrad - concurrent PO catalog translation
///
/// Translates every msgid of a gettext catalog through a LibreTranslate-compatible
/// service and writes an ORIGINAL/TRADUCCIÓN report.
#[derive(Parser, Debug)]
#[command(name = "potrad")]
#[command(version)]
#[command(about = "Concurrent PO catalog translation")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "potrad reads a gettext catalog and translates every entry concurrently.

EXAMPLES:
    potrad                                       # Translate messages.po using defaults
    potrad -i app.po -o app_es.txt               # Explicit input and output
    potrad -s en -t fr -w 8                      # English to French with 8 workers
    potrad --continue-on-error --failed-entries placeholder
    potrad completions bash > potrad.bash        # Generate bash completions

CONFIGURATION:
    Settings are read from potrad.json when it exists; command line flags
    override the file. Without a file the built-in defaults are used.

EXIT CODES:
    0 success, 1 configuration error, 2 catalog error, 3 run aborted, 4 output error")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; the max level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let args = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "potrad", &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Some(Commands::Translate(args)) => args,
        None => cli.translate,
    };

    run_translate(args).await
}

async fn run_translate(options: TranslateArgs) -> ExitCode {
    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = match Controller::with_config(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    match controller.run().await {
        Ok(result) => {
            let summary = result.summary();
            if summary.failed > 0 {
                info!("Completed with {} failed entries", summary.failed);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

// @loads: Config file, then command line overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&options.config)?;
    apply_overrides(&mut config, options);
    Ok(config)
}

fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(input) = &options.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &options.output {
        config.output_path = output.clone();
    }
    if let Some(url) = &options.url {
        config.service.url = url.clone();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(workers) = options.workers {
        config.pipeline.workers = workers;
    }
    if options.continue_on_error {
        config.pipeline.continue_on_error = true;
    }
    if let Some(policy) = &options.failed_entries {
        config.pipeline.failed_entries = policy.clone().into();
    }
    if options.no_progress {
        config.pipeline.progress = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.debug {
        config.log_level = app_config::LogLevel::Debug;
    }
}
