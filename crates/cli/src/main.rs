// stocksnap - inventory reconciliation from the command line

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use stocksnap_inventory::{SortDirection, SortField};
use stocksnap_store::{HttpRemote, InventoryStore, SqliteBlobStore};

#[derive(Parser)]
#[command(name = "stocksnap")]
#[command(about = "Track stock levels and reconcile scanned usage lists")]
#[command(version)]
struct Cli {
    /// Remote inventory endpoint; enables sync for this run
    #[arg(long, global = true, env = "STOCKSNAP_SERVER_URL")]
    server_url: Option<String>,

    /// Bearer token for the remote inventory endpoint
    #[arg(long, global = true, env = "STOCKSNAP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory holding store.db (defaults to the OS data directory)
    #[arg(long, global = true, env = "STOCKSNAP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items, optionally filtered and sorted
    List {
        /// Case-insensitive match on name or category
        #[arg(long, short = 's', default_value = "")]
        search: String,

        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Apply a scanned usage list (JSON array of scan guesses)
    #[command(after_help = "\
Examples:
  stocksnap reconcile scans.json
  stocksnap reconcile scans.json --dry-run
  stocksnap reconcile scans.json --report-underflow
  stocksnap reconcile answer.txt --model-reply")]
    Reconcile {
        scans: PathBuf,

        /// The file is a vision model's answer to `stocksnap prompt`
        #[arg(long)]
        model_reply: bool,

        /// Log every scan that asked for more than was on hand
        #[arg(long)]
        report_underflow: bool,

        /// Show what each scan would do without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace the item list from a setup form (JSON array of item drafts)
    Edit { items: PathBuf },

    /// Print the prompt for reading a handwritten usage list with a vision model
    Prompt,

    /// Low-stock items and per-category health
    Alerts,

    /// Ledger of one item, newest first
    History {
        /// Item name (same fuzzy match as scans)
        name: String,
    },

    /// Pull the remote snapshot now
    Sync,

    /// Show or change remote sync settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings (API key masked)
    Show,

    /// Update stored settings
    Set {
        /// Remote inventory endpoint to store
        #[arg(long)]
        url: Option<String>,

        /// Bearer token to store; pass an empty value to clear it
        #[arg(long)]
        key: Option<String>,

        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,

        #[arg(long)]
        auto_sync: Option<bool>,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum SortArg {
    Name,
    Category,
    Quantity,
}

impl From<SortArg> for SortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortField::Name,
            SortArg::Category => SortField::Category,
            SortArg::Quantity => SortField::Quantity,
        }
    }
}

fn open_store(cli: &Cli) -> anyhow::Result<InventoryStore> {
    let blobs = match &cli.data_dir {
        Some(dir) => SqliteBlobStore::open(dir.join("store.db")),
        None => SqliteBlobStore::open_default().context("no data directory available")?,
    };
    Ok(InventoryStore::new(Arc::new(blobs)).with_remote(Arc::new(HttpRemote::new())))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let base = open_store(&cli)?;
    let store = base
        .clone()
        .with_config_overrides(cli.server_url.clone(), cli.api_key.clone());

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::List { search, sort, desc } => {
            let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
            commands::list(&store, &search, sort.into(), direction, &mut out).await
        }
        Commands::Reconcile {
            scans,
            model_reply,
            report_underflow,
            dry_run,
        } => {
            let scans = commands::read_scans(&scans, model_reply)?;
            if dry_run {
                commands::preview(&store, &scans, &mut out).await
            } else {
                commands::reconcile(&store, &scans, report_underflow, &mut out).await
            }
        }
        Commands::Edit { items } => {
            let drafts = commands::read_json(&items)?;
            commands::edit(&store, drafts, &mut out).await
        }
        Commands::Prompt => commands::prompt(&store, &mut out).await,
        Commands::Alerts => commands::alerts(&store, &mut out).await,
        Commands::History { name } => commands::history(&store, &name, &mut out).await,
        Commands::Sync => commands::sync(&store, &mut out).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&store, &mut out).await,
            ConfigAction::Set {
                url,
                key,
                enable,
                disable,
                auto_sync,
            } => {
                let enabled = match (enable, disable) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                let update = commands::ConfigUpdate {
                    server_url: url,
                    api_key: key,
                    enabled,
                    auto_sync,
                };
                // Stored settings only; flags and env overrides are per-run.
                commands::config_set(&base, update, &mut out).await
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    stocksnap_observability::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
