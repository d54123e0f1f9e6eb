//! telesend CLI
//!
//! Pick recipients from a paginated checklist, then send them a file.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use telesend::catalog::load_catalog;
use telesend::config::{self, Config, ConfigError};
use telesend::dispatch::{CommandMessenger, Document, deliver_all};
use telesend::report::{format_delivery, format_selection};
use telesend::tui::{self, Outcome, Picker};
use telesend::types::{OutputFormat, Recipient};

#[derive(Parser)]
#[command(name = "telesend")]
#[command(about = "Pick recipients from a paginated checklist and send them a file")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.telesend/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose recipients interactively and print them
    Pick {
        /// Directory export (JSON) listing the available recipients
        #[arg(long)]
        catalog: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Choose recipients interactively and send them a file
    Send {
        /// Directory export (JSON) listing the available recipients
        #[arg(long)]
        catalog: PathBuf,

        /// File to send
        #[arg(long)]
        path: PathBuf,

        /// Caption sent with the file
        #[arg(long, default_value = "")]
        msg: String,

        /// Client program that performs one delivery
        #[arg(long)]
        via: OsString,

        /// Extra arguments for the client, placed before target and file
        #[arg(last = true)]
        via_args: Vec<OsString>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Prompt for credentials and write a fresh config
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Pick { catalog, format } => cmd_pick(config_path, &catalog, format.into()),
        Commands::Send {
            catalog,
            path,
            msg,
            via,
            via_args,
            format,
        } => cmd_send(config_path, &catalog, &path, &msg, via, via_args, format.into()),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(config_path, force),
            ConfigAction::Show => cmd_config_show(config_path),
            ConfigAction::Path => cmd_config_path(config_path),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ============================================================================
// CONFIG
// ============================================================================

/// Load the config, running the first-run prompt when there is none yet.
fn load_or_create_config(explicit: Option<&Path>) -> Result<Config, String> {
    let path = config::resolve_config_path(explicit).map_err(|e| e.to_string())?;

    match config::load(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound { .. }) => {
            tracing::info!(path = %path.display(), "no config yet, prompting");
            let stdin = io::stdin();
            config::create_interactive(&path, &mut stdin.lock(), &mut io::stdout())
                .map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style =
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

/// Run the picker over `recipients` with the configured page size and glyphs.
fn pick(recipients: &[Recipient], config: &Config) -> Result<Outcome, String> {
    if recipients.is_empty() {
        tracing::warn!("catalog is empty");
    }
    let picker = Picker::from_recipients(recipients, config.page_size());
    tui::run(picker, &config.glyphs()).map_err(|e| format!("Terminal error: {}", e))
}

fn cmd_pick(
    config_path: Option<&Path>,
    catalog: &Path,
    format: OutputFormat,
) -> Result<(), String> {
    let config = load_or_create_config(config_path)?;
    let recipients = load_catalog(catalog).map_err(|e| format!("{}: {}", catalog.display(), e))?;

    let outcome = pick(&recipients, &config)?;
    let chosen = outcome.resolve(&recipients);

    print!("{}", format_selection(&outcome, &chosen, format));
    Ok(())
}

fn cmd_send(
    config_path: Option<&Path>,
    catalog: &Path,
    path: &Path,
    msg: &str,
    via: OsString,
    via_args: Vec<OsString>,
    format: OutputFormat,
) -> Result<(), String> {
    let config = load_or_create_config(config_path)?;
    let recipients = load_catalog(catalog).map_err(|e| format!("{}: {}", catalog.display(), e))?;

    // Fail on an unreadable file before the user spends time picking
    let document = Document::load(path, msg).map_err(|e| format!("{}: {}", path.display(), e))?;

    let outcome = pick(&recipients, &config)?;
    let chosen = outcome.resolve(&recipients);
    if chosen.is_empty() {
        print!("{}", format_selection(&outcome, &chosen, format));
        return Ok(());
    }

    let mut messenger = CommandMessenger::new(via, via_args, config.auth.clone());

    let pb = progress_bar(chosen.len() as u64, "Sending...");
    let report = deliver_all(&mut messenger, &chosen, &document, |recipient| {
        pb.set_message(recipient.label.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    print!("{}", format_delivery(&report, &document, format));

    if report.is_complete_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} deliveries failed",
            report.failed.len(),
            chosen.len()
        ))
    }
}

fn cmd_config_init(config_path: Option<&Path>, force: bool) -> Result<(), String> {
    let path = config::resolve_config_path(config_path).map_err(|e| e.to_string())?;

    if path.exists() && !force {
        return Err(format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    let stdin = io::stdin();
    config::create_interactive(&path, &mut stdin.lock(), &mut io::stdout())
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<(), String> {
    let path = config::resolve_config_path(config_path).map_err(|e| e.to_string())?;
    let config = config::load(&path).map_err(|e| e.to_string())?;

    print!("{}", config.to_toml().map_err(|e| e.to_string())?);
    Ok(())
}

fn cmd_config_path(config_path: Option<&Path>) -> Result<(), String> {
    let path = config::resolve_config_path(config_path).map_err(|e| e.to_string())?;
    println!("{}", path.display());
    Ok(())
}
