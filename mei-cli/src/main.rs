use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use mei_cli::config::ProfileFile;
use mei_cli::report::Report;
use mei_cli::utils::{parse_decimal, parse_entry_kind};
use mei_cli::{app, logging};
use mei_core::store::StoreConfig;
use mei_core::{EntryKind, Organizer, WhatIfScenario};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// IRPF simulation for Brazilian micro-entrepreneurs (MEI).
///
/// Every command restores the saved state, recomputes the simulation under
/// the rules in force, and saves again when it changed something.
#[derive(Debug, Parser)]
#[command(name = "mei-organizer", version)]
struct Cli {
    /// Storage backend: `json-file`, `sqlite` or `memory`.
    #[arg(long, global = true, default_value = "json-file")]
    backend: String,

    /// Backend location. A file path for `json-file` and `sqlite`
    /// (`:memory:` for an ephemeral SQLite database).
    #[arg(long, global = true, default_value = "mei_organizer_state.json")]
    store: String,

    /// TOML file overriding the built-in tax rules.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV bracket table replacing the built-in one.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Tax year to simulate; selects the year in `--brackets`.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide log output on the terminal. File logging is unaffected.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the financial summary and bracket table.
    Simulate,

    /// Print the full report: profile, summary, breakdowns and checks.
    Report,

    /// Print the validation checks and completion progress.
    Validate,

    /// Load profile sections from a TOML file.
    Profile {
        file: PathBuf,
    },

    /// Add revenue, expense or asset entries from CSV files.
    Import {
        #[arg(long)]
        revenues: Option<PathBuf>,
        #[arg(long)]
        expenses: Option<PathBuf>,
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Delete one ledger entry.
    Delete {
        #[arg(value_parser = parse_entry_kind)]
        kind: EntryKind,
        id: i64,
    },

    /// Layer hypothetical changes over the ledger, or turn them off.
    WhatIf {
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        revenue: Decimal,
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        expense: Decimal,
        #[arg(long, default_value_t = 0)]
        dependents: u32,
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        pension: Decimal,
        /// Deactivate the scenario and zero its deltas.
        #[arg(long, conflicts_with_all = ["revenue", "expense", "dependents", "pension"])]
        off: bool,
    },

    /// Write a JSON export to a file, or stdout when no file is given.
    Export {
        #[arg(long, value_enum, default_value_t = ExportKind::Snapshot)]
        kind: ExportKind,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Erase every stored record.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    /// Identification, simulation and headline figures.
    Snapshot,
    /// The entire state tree.
    Backup,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    logging::init_logging(if cli.verbose { "debug" } else { "warn" });
    if cli.quiet {
        logging::set_terminal_enabled(false)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let rules = app::load_rules(cli.config.as_deref(), cli.brackets.as_deref(), cli.year)?;

    let store_config = StoreConfig {
        backend: cli.backend.clone(),
        location: cli.store.clone(),
    };
    debug!("opening {} backend", store_config.backend);
    let registry = app::build_registry();
    let repo = registry
        .create(&store_config)
        .await
        .with_context(|| format!("cannot open store '{}'", store_config.location))?;

    let mut organizer = Organizer::restore(rules, &*repo).await?;

    match cli.command {
        Command::Simulate => print!("{}", Report::summary(&organizer)),
        Command::Report => print!("{}", Report::full(&organizer)),
        Command::Validate => {
            let report = organizer.validations();
            println!("Preenchimento: {}%", report.progress);
            for check in &report.checks {
                println!(
                    "{:<8} {}: {}",
                    check.severity.as_str(),
                    check.kind.title(),
                    check.message
                );
            }
        }
        Command::Profile { file } => {
            let profile = ProfileFile::from_file(&file)?;
            let applied = profile.apply_to(&mut organizer);
            app::save(&organizer, &*repo).await?;
            println!("Seções atualizadas: {}", applied.join(", "));
        }
        Command::Import {
            revenues,
            expenses,
            assets,
        } => {
            let result = app::import_entries(
                &mut organizer,
                revenues.as_deref(),
                expenses.as_deref(),
                assets.as_deref(),
            );
            // Rows added before a rejected one are kept.
            app::save(&organizer, &*repo).await?;
            let counts = result?;
            println!(
                "Importados: {} receitas, {} despesas, {} bens",
                counts.revenues, counts.expenses, counts.assets
            );
        }
        Command::Delete { kind, id } => {
            if !organizer.delete_entry(id, kind) {
                anyhow::bail!("no {} entry with id {id}", kind.as_str());
            }
            app::save(&organizer, &*repo).await?;
            println!("Removido: {} {id}", kind.as_str());
        }
        Command::WhatIf {
            revenue,
            expense,
            dependents,
            pension,
            off,
        } => {
            if off {
                organizer.deactivate_what_if();
            } else {
                organizer.apply_what_if(WhatIfScenario::new(revenue, expense, dependents, pension));
            }
            app::save(&organizer, &*repo).await?;
            print!("{}", Report::summary(&organizer));
        }
        Command::Export { kind, out } => {
            let now = Utc::now();
            let json = match kind {
                ExportKind::Snapshot => organizer.simulation_snapshot(now).to_json()?,
                ExportKind::Backup => organizer.full_backup(now).to_json()?,
            };
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("cannot write '{}'", path.display()))?;
                    info!(path = %path.display(), "export written");
                }
                None => println!("{json}"),
            }
        }
        Command::Clear => {
            organizer.clear(&*repo).await?;
            println!("Dados apagados.");
        }
    }

    Ok(())
}
