//! Command-line surface for sib.
//!
//! Thin wiring layer: parse flags, resolve config, hand off to the library.
//! `browse` opens the interactive terminal browser; the remaining commands
//! are headless so the same filter, search, sort, and validation paths can
//! run in scripts and CI. Output is human text on a terminal and JSON lines
//! when piped, overridable with `--json` or `SIB_OUTPUT_FORMAT`.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use showroom_inventory_browser::core::catalog::{Catalog, Vehicle};
use showroom_inventory_browser::core::config::Config;
use showroom_inventory_browser::core::errors::SibError;
use showroom_inventory_browser::forms::{ContactFieldId, ContactForm, FieldRules, SubmissionRecord};
use showroom_inventory_browser::inventory::{InventoryController, NullPort, SortKey};
use showroom_inventory_browser::logger::{InteractionLog, LogHandle};
use showroom_inventory_browser::tui;

// ──────────────────── parser surface ────────────────────

/// Top-level argument parser.
#[derive(Debug, Parser)]
#[command(
    name = "sib",
    author,
    version,
    about = "Showroom inventory browser for the terminal",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Force machine-readable JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Turn off colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print extra diagnostics on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive showroom browser.
    Browse(BrowseArgs),
    /// Print the inventory after applying filter, search, and sort.
    List(ListArgs),
    /// Validate a contact message without opening the browser.
    Check(CheckArgs),
    /// Inspect or generate vehicle catalogs.
    Catalog(CatalogArgs),
    /// Inspect or manage the configuration file.
    Config(ConfigArgs),
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Serialize, Default)]
pub struct BrowseArgs {
    /// Catalog file to browse instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
pub struct ListArgs {
    /// Category to keep; everything else is hidden ("all" disables).
    #[arg(long, value_name = "CATEGORY")]
    pub filter: Option<String>,

    /// Case-insensitive substring to search for.
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Sort criterion: none, price-low, price-high, year-new, year-old.
    #[arg(long, value_name = "KEY")]
    pub sort: Option<String>,

    /// Catalog file to list instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
pub struct CheckArgs {
    /// Visitor name (required field).
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub name: String,

    /// Reply address (required field).
    #[arg(long, value_name = "ADDR", default_value = "")]
    pub email: String,

    /// Call-back number (optional field).
    #[arg(long, value_name = "NUMBER", default_value = "")]
    pub phone: String,

    /// Message body (required field).
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub message: String,
}

#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CatalogAction {
    /// Summarize a catalog: stock count and category breakdown.
    Show {
        /// Catalog file to summarize instead of the configured one.
        #[arg(long, value_name = "PATH")]
        catalog: Option<PathBuf>,
    },
    /// Generate a deterministic demo catalog.
    Seed {
        /// Number of vehicles to generate.
        #[arg(long, default_value_t = 12)]
        count: usize,

        /// Seed for the generator; the same seed yields the same stock.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write the catalog here instead of printing it.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Load and validate the configuration, printing its stable hash.
    Validate,
}

#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

// ──────────────────── output mode & errors ────────────────────

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// CLI-level failures, mapped onto process exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad input from the operator: unknown tokens, invalid files, rejected forms.
    #[error("{0}")]
    User(String),

    /// The environment failed underneath us.
    #[error("{0}")]
    Runtime(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// A bug on our side.
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 1 usage, 2 runtime, 3 internal.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<SibError> for CliError {
    fn from(err: SibError) -> Self {
        match &err {
            SibError::InvalidConfig { .. }
            | SibError::MissingConfig { .. }
            | SibError::ConfigParse { .. }
            | SibError::MissingCatalog { .. }
            | SibError::InvalidCatalog { .. } => Self::User(err.to_string()),
            SibError::Serialization { .. } => Self::Internal(err.to_string()),
            SibError::Io { .. }
            | SibError::ChannelClosed { .. }
            | SibError::Terminal { .. }
            | SibError::Runtime { .. } => Self::Runtime(err.to_string()),
        }
    }
}

// ──────────────────── dispatch ────────────────────

/// Run the parsed command to completion.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }
    let mode = output_mode(cli);

    match &cli.command {
        Command::Browse(args) => run_browse(cli, args),
        Command::List(args) => run_list(cli, args, mode),
        Command::Check(args) => run_check(args, mode),
        Command::Catalog(args) => run_catalog(cli, args, mode),
        Command::Config(args) => run_config(cli, args, mode),
        Command::Completions(args) => run_completions(args),
    }
}

fn run_browse(cli: &Cli, args: &BrowseArgs) -> Result<(), CliError> {
    let config = load_effective_config(cli)?;
    let catalog = load_catalog(&config, args.catalog.as_deref())?;
    let log = open_log(&config);
    tui::run_browser(config, &catalog, log)?;
    Ok(())
}

fn run_list(cli: &Cli, args: &ListArgs, mode: OutputMode) -> Result<(), CliError> {
    let config = load_effective_config(cli)?;
    let catalog = load_catalog(&config, args.catalog.as_deref())?;

    let filter = args
        .filter
        .clone()
        .unwrap_or_else(|| config.view.default_filter.clone());
    let search = args.search.clone().unwrap_or_default();
    let sort = parse_sort(args.sort.as_deref().unwrap_or(&config.view.default_sort))?;

    let mut controller = InventoryController::new(&catalog, NullPort);
    controller.set_filter(&filter);
    controller.set_search_term(&search);
    controller.set_sort_key(sort);

    let visible = controller.visible_vehicles();
    match mode {
        OutputMode::Human => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in vehicle_rows(&visible) {
                writeln!(out, "{line}")?;
            }
            if !cli.quiet {
                writeln!(
                    out,
                    "{} of {} vehicles shown (filter: {}, search: {}, sort: {})",
                    visible.len(),
                    controller.len(),
                    filter,
                    if search.is_empty() { "-" } else { &search },
                    sort.label(),
                )?;
            }
        }
        OutputMode::Json => {
            for vehicle in &visible {
                write_json_line(vehicle)?;
            }
            write_json_line(&json!({
                "visible": visible.len(),
                "total": controller.len(),
                "filter": filter,
                "search": search,
                "sort": sort.token(),
            }))?;
        }
    }
    Ok(())
}

fn run_check(args: &CheckArgs, mode: OutputMode) -> Result<(), CliError> {
    match validate_contact(args)? {
        Ok(record) => {
            match mode {
                OutputMode::Human => {
                    println!("message from {} accepted", record.name);
                }
                OutputMode::Json => {
                    write_json_line(&json!({ "valid": true, "record": record }))?;
                }
            }
            Ok(())
        }
        Err(errors) => {
            match mode {
                OutputMode::Human => {
                    for (id, message) in &errors {
                        println!("{}: {message}", id.label());
                    }
                }
                OutputMode::Json => {
                    let fields: Vec<_> = errors
                        .iter()
                        .map(|(id, message)| {
                            json!({
                                "field": id.label().to_ascii_lowercase(),
                                "message": message,
                            })
                        })
                        .collect();
                    write_json_line(&json!({ "valid": false, "errors": fields }))?;
                }
            }
            Err(CliError::User("contact message failed validation".to_string()))
        }
    }
}

fn run_catalog(cli: &Cli, args: &CatalogArgs, mode: OutputMode) -> Result<(), CliError> {
    match &args.action {
        CatalogAction::Show { catalog } => {
            let config = load_effective_config(cli)?;
            let catalog = load_catalog(&config, catalog.as_deref())?;
            let breakdown = category_breakdown(&catalog);
            match mode {
                OutputMode::Human => {
                    println!(
                        "{} vehicles across {} categories",
                        catalog.len(),
                        breakdown.len()
                    );
                    for (category, count) in &breakdown {
                        println!("  {category:<8}{count}");
                    }
                }
                OutputMode::Json => {
                    let categories: serde_json::Map<String, serde_json::Value> = breakdown
                        .into_iter()
                        .map(|(category, count)| (category, json!(count)))
                        .collect();
                    write_json_line(&json!({
                        "vehicles": catalog.len(),
                        "categories": categories,
                    }))?;
                }
            }
            Ok(())
        }
        CatalogAction::Seed {
            count,
            seed,
            output,
        } => {
            let catalog = Catalog::seeded(*count, *seed);
            if let Some(path) = output {
                catalog.save(path)?;
                match mode {
                    OutputMode::Human => {
                        println!("wrote {} vehicles to {}", catalog.len(), path.display());
                    }
                    OutputMode::Json => {
                        write_json_line(&json!({
                            "vehicles": catalog.len(),
                            "path": path,
                        }))?;
                    }
                }
            } else {
                match mode {
                    OutputMode::Human => {
                        let vehicles: Vec<_> = catalog.vehicles.iter().collect();
                        for line in vehicle_rows(&vehicles) {
                            println!("{line}");
                        }
                    }
                    OutputMode::Json => {
                        for vehicle in &catalog.vehicles {
                            write_json_line(vehicle)?;
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

fn run_config(cli: &Cli, args: &ConfigArgs, mode: OutputMode) -> Result<(), CliError> {
    match &args.action {
        ConfigAction::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            match mode {
                OutputMode::Human => println!("{}", path.display()),
                OutputMode::Json => write_json_line(&json!({ "path": path }))?,
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_effective_config(cli)?;
            match mode {
                OutputMode::Human => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|error| CliError::Internal(error.to_string()))?;
                    print!("{rendered}");
                }
                OutputMode::Json => write_json_line(&config)?,
            }
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            if path.exists() && !force {
                return Err(CliError::User(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )));
            }
            Config::default().save(&path)?;
            match mode {
                OutputMode::Human => println!("wrote {}", path.display()),
                OutputMode::Json => write_json_line(&json!({ "path": path }))?,
            }
            Ok(())
        }
        ConfigAction::Validate => {
            let config = load_effective_config(cli)?;
            let hash = config.stable_hash()?;
            match mode {
                OutputMode::Human => println!("configuration OK (hash {hash})"),
                OutputMode::Json => {
                    write_json_line(&json!({ "status": "ok", "hash": hash }))?;
                }
            }
            Ok(())
        }
    }
}

fn run_completions(args: &CompletionsArgs) -> Result<(), CliError> {
    let mut command = Cli::command();
    let binary_name = command.get_name().to_string();
    generate(args.shell, &mut command, binary_name, &mut io::stdout());
    Ok(())
}

// ──────────────────── shared helpers ────────────────────

fn load_effective_config(cli: &Cli) -> Result<Config, CliError> {
    let config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        let hash = config.stable_hash()?;
        eprintln!(
            "sib: config {} (hash {hash})",
            config.paths.config_file.display()
        );
    }
    Ok(config)
}

/// Resolve the catalog: explicit flag, then the configured file, then the
/// built-in sample stock. Only the explicit flag treats absence as an error.
fn load_catalog(config: &Config, explicit: Option<&Path>) -> Result<Catalog, CliError> {
    if let Some(path) = explicit {
        return Ok(Catalog::load(path)?);
    }
    if config.paths.catalog_file.exists() {
        return Ok(Catalog::load(&config.paths.catalog_file)?);
    }
    Ok(Catalog::sample())
}

fn open_log(config: &Config) -> LogHandle {
    if config.log.enabled {
        LogHandle::new(InteractionLog::open(
            config.paths.interaction_log.clone(),
            config.log.max_size_kb,
        ))
    } else {
        LogHandle::disabled()
    }
}

fn parse_sort(raw: &str) -> Result<SortKey, CliError> {
    SortKey::parse(raw).ok_or_else(|| {
        let tokens: Vec<&str> = SortKey::ALL.iter().map(|key| key.token()).collect();
        CliError::User(format!(
            "unknown sort criterion {raw:?} (expected one of: {})",
            tokens.join(", ")
        ))
    })
}

type FieldErrors = Vec<(ContactFieldId, &'static str)>;

/// Run the contact rules over the submitted fields.
///
/// The outer error is infrastructure (a rule pattern failing to compile);
/// the inner `Err` carries the per-field rejections.
fn validate_contact(args: &CheckArgs) -> Result<Result<SubmissionRecord, FieldErrors>, CliError> {
    let rules = FieldRules::new().map_err(|e| CliError::Internal(e.to_string()))?;
    let mut form = ContactForm::new(rules);
    form.set_value(ContactFieldId::Name, &args.name);
    form.set_value(ContactFieldId::Email, &args.email);
    form.set_value(ContactFieldId::Phone, &args.phone);
    form.set_value(ContactFieldId::Message, &args.message);

    match form.submit(chrono::Utc::now()) {
        Some(record) => Ok(Ok(record)),
        None => {
            let errors: FieldErrors = ContactFieldId::ALL
                .into_iter()
                .filter_map(|id| form.error(id).map(|message| (id, message)))
                .collect();
            Ok(Err(errors))
        }
    }
}

fn vehicle_rows(vehicles: &[&Vehicle]) -> Vec<String> {
    vehicles
        .iter()
        .map(|v| {
            format!(
                "{:>4}  {:<34}{:<8}{:>10}  {:>6}",
                v.id,
                v.label,
                v.category,
                v.display_price(),
                v.display_year()
            )
        })
        .collect()
}

fn category_breakdown(catalog: &Catalog) -> Vec<(String, usize)> {
    let mut breakdown: Vec<(String, usize)> = Vec::new();
    for vehicle in &catalog.vehicles {
        match breakdown.iter_mut().find(|(c, _)| *c == vehicle.category) {
            Some((_, count)) => *count += 1,
            None => breakdown.push((vehicle.category.clone(), 1)),
        }
    }
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    breakdown
}

// ──────────────────── output plumbing ────────────────────

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("SIB_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

/// Precedence: `--json` flag, then `SIB_OUTPUT_FORMAT`, then the terminal.
/// Piped output defaults to JSON so scripts never have to parse tables.
fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    match env_mode {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => {
            if stdout_is_tty {
                OutputMode::Human
            } else {
                OutputMode::Json
            }
        }
    }
}

fn write_json_line<T: Serialize>(value: &T) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

// ──────────────────── tests ────────────────────
