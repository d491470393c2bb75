//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use leetlog_core::coverage::{CoverageReportConfig, report_coverage};
use leetlog_core::detect;
use leetlog_core::progress::ProgressReporter;
use leetlog_core::update::{UpdateCatalogConfig, update_catalog};
use leetlog_metadata::{ClientOptions, LeetCodeClient};
use leetlog_shared::{AppConfig, LeetlogError, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// leetlog keeps a solved-problems catalog up to date.
#[derive(Parser)]
#[command(
    name = "leetlog",
    version,
    about = "Keep a Markdown catalog of solved problems and its coverage summary up to date.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./leetlog.toml, then ~/.leetlog/leetlog.toml).
    #[arg(long, global = true, env = "LEETLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog document, overriding `document.path` from the config.
    #[arg(long, global = true)]
    pub readme: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Merge solution files into the catalog table.
    Update {
        /// Source files to merge. Defaults to files added since `detect.base_ref`.
        files: Vec<PathBuf>,

        /// Report what would change without writing the document.
        #[arg(long)]
        dry_run: bool,
    },

    /// Recompute the coverage block.
    Coverage {
        /// Report whether the block would change without writing the document.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "leetlog=info",
        1 => "leetlog=debug",
        _ => "leetlog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Update { ref files, dry_run } => {
            let config = resolve_config(&cli)?;
            cmd_update(&config, files.clone(), dry_run).await
        }
        Command::Coverage { dry_run } => {
            let config = resolve_config(&cli)?;
            cmd_coverage(&config, dry_run).await
        }
        Command::Config { ref action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&resolve_config(&cli)?),
        },
    }
}

/// Load the config and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(readme) = &cli.readme {
        config.document.path = readme.clone();
    }
    Ok(config)
}

fn build_client(config: &AppConfig) -> Result<LeetCodeClient> {
    let mut opts = ClientOptions::new(&config.api.endpoint)?;
    opts.timeout_secs = config.api.timeout_secs;
    Ok(LeetCodeClient::new(&opts)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_update(config: &AppConfig, files: Vec<PathBuf>, dry_run: bool) -> Result<()> {
    let document = &config.document.path;
    if !document.is_file() {
        return Err(LeetlogError::DocumentNotFound {
            path: document.clone(),
        }
        .into());
    }

    let files = if files.is_empty() {
        let root = detect::document_root(document);
        let added = detect::added_files(&root, &config.detect)?;
        info!(
            count = added.len(),
            base_ref = %config.detect.base_ref,
            "detected added source files"
        );
        added
    } else {
        files
    };

    if files.is_empty() {
        println!("No new source files.");
        return Ok(());
    }

    let client = build_client(config)?;
    let update_config = UpdateCatalogConfig::from_app(config, files, dry_run);

    let reporter = CliProgress::new();
    let result = update_catalog(&update_config, &client, &reporter).await?;

    println!();
    println!("  Catalog: {}", document.display());
    println!("  Added:     {}", result.added);
    println!("  Extended:  {}", result.extended);
    println!("  Unchanged: {}", result.unchanged);
    println!("  Skipped:   {}", result.skipped);
    println!("  Failed:    {}", result.failed);
    if dry_run {
        println!("  Dry run: document not written");
    } else if !result.written {
        println!("  No changes");
    }
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_coverage(config: &AppConfig, dry_run: bool) -> Result<()> {
    let client = build_client(config)?;
    let coverage_config = CoverageReportConfig::from_app(config, dry_run);

    let reporter = CliProgress::new();
    let result = report_coverage(&coverage_config, &client, &reporter).await?;
    let summary = &result.summary;

    println!();
    println!("  Catalog: {}", config.document.path.display());
    println!("  Solved:  {}", summary.solved.total());
    match summary.totals {
        Some(totals) => println!("  Total:   {}", totals.all),
        None => println!("  Total:   unavailable"),
    }
    let status = match (result.changed, result.written) {
        (false, _) => "unchanged",
        (true, true) => "updated",
        (true, false) => "would change (dry run)",
    };
    println!("  Block:   {status}");
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd =
        std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn item(&self, label: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Resolving [{current}/{total}] {label}"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}
