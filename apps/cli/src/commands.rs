//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dashprep_core::assembler::validate_dataset;
use dashprep_core::catalog::AggregateLimits;
use dashprep_core::pipeline::{
    BuildConfig, BuildResult, EmitSelection, ProgressReporter, build_dataset,
};
use dashprep_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DashPrep — turn raw research tables into dashboard datasets.
#[derive(Parser)]
#[command(
    name = "dashprep",
    version,
    about = "Turn personnel and funded-project tables into dashboard-ready statistics.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Artifact selection for `build`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum EmitArg {
    Json,
    Ts,
    All,
}

impl From<EmitArg> for EmitSelection {
    fn from(arg: EmitArg) -> Self {
        match arg {
            EmitArg::Json => EmitSelection::Json,
            EmitArg::Ts => EmitSelection::Ts,
            EmitArg::All => EmitSelection::All,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the dashboard dataset from the input tables.
    Build {
        /// Personnel table (CSV). Defaults to the configured path.
        #[arg(long)]
        personnel: Option<String>,

        /// Funded-projects table (CSV). Defaults to the configured path.
        #[arg(long)]
        projects: Option<String>,

        /// Output directory root. Defaults to the configured directory.
        #[arg(short, long)]
        out: Option<String>,

        /// Dataset name (directory name under the output root).
        #[arg(short, long, default_value = "dashboard")]
        name: String,

        /// Recruitment target year. Defaults to the configured year.
        #[arg(long)]
        year: Option<i32>,

        /// Artifacts to emit.
        #[arg(long, value_enum, default_value = "all")]
        emit: EmitArg,
    },

    /// Print a table's column names and leading rows.
    Inspect {
        /// Table path (CSV).
        table: String,

        /// Rows to show.
        #[arg(short, long, default_value = "5")]
        rows: usize,
    },

    /// Check that a dataset directory is well-formed.
    Validate {
        /// Dataset directory path.
        dataset: String,
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
        0 => "dashprep=info",
        1 => "dashprep=debug",
        _ => "dashprep=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            personnel,
            projects,
            out,
            name,
            year,
            emit,
        } => cmd_build(
            personnel.as_deref(),
            projects.as_deref(),
            out.as_deref(),
            &name,
            year,
            emit,
        ),
        Command::Inspect { table, rows } => cmd_inspect(&table, rows),
        Command::Validate { dataset } => cmd_validate(&dataset),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(
    personnel: Option<&str>,
    projects: Option<&str>,
    out: Option<&str>,
    name: &str,
    year: Option<i32>,
    emit: EmitArg,
) -> Result<()> {
    let config = load_config()?;

    let personnel_path = expand_home(personnel.unwrap_or(&config.inputs.personnel));
    let projects_path = expand_home(projects.unwrap_or(&config.inputs.projects));
    let output_root = expand_home(out.unwrap_or(&config.defaults.output_dir));
    let target_year = year.unwrap_or(config.defaults.target_year);

    if !personnel_path.exists() {
        return Err(eyre!(
            "personnel table not found at '{}'",
            personnel_path.display()
        ));
    }

    let build_config = BuildConfig {
        personnel_path,
        projects_path,
        output_root,
        name: name.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        target_year,
        limits: AggregateLimits {
            top_departments: config.defaults.top_departments,
            top_performance: config.defaults.top_performance,
        },
        top_projects: config.defaults.top_projects,
        emit: emit.into(),
    };

    info!(name, target_year, "building dashboard dataset");

    let reporter = CliProgress::new();
    let result = build_dataset(&build_config, &reporter)?;

    // Print summary
    println!();
    println!("  Dataset built successfully!");
    println!("  Run:         {}", result.run_id);
    println!("  Researchers: {}", result.researcher_count);
    println!("  Matched:     {}", result.matched_project_count);
    println!("  Path:        {}", result.dataset_path.display());
    println!("  Time:        {:.1}s", result.elapsed.as_secs_f64());
    if result.recruitment_degraded {
        println!();
        println!("  Note: projects table unavailable — recruitment view is empty.");
    }
    println!();

    Ok(())
}

fn cmd_inspect(table: &str, rows: usize) -> Result<()> {
    let path = expand_home(table);
    let preview = dashprep_tabular::preview(&path, rows)?;

    println!();
    println!("  Table:   {}", path.display());
    println!("  Rows:    {}", preview.total_rows);
    println!("  Columns: {}", preview.columns.join(", "));
    println!();

    for (i, row) in preview.rows.iter().enumerate() {
        println!("  [{}] {}", i + 1, row.join(" | "));
    }
    println!();

    Ok(())
}

fn cmd_validate(dataset: &str) -> Result<()> {
    let path = expand_home(dataset);
    validate_dataset(&path)?;
    println!("Dataset at '{}' is well-formed.", path.display());
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    Path::new(path).to_path_buf()
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
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
