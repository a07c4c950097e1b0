//! Catalog identity CLI
//!
//! Derives qualified names, lineage process fingerprints and relationship
//! references for catalog assets, printing JSON to stdout. Useful for ETL
//! jobs that need the identity of what they are about to register.

mod commands;
mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use config::CliConfig;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration directory
    #[arg(short, long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment (development, production, etc.)
    #[arg(short, long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    /// Fingerprint scheme override (concatenated, length_prefixed)
    #[arg(long)]
    fingerprint_scheme: Option<String>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the qualified name of a hierarchical asset
    QualifiedName {
        #[arg(long)]
        type_name: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: String,
    },
    /// Derive a connection qualified name
    Connection {
        #[arg(long)]
        connector: String,
        /// Creation time in epoch seconds (defaults to now)
        #[arg(long)]
        epoch: Option<i64>,
    },
    /// Build a lineage process; references are `[Type@]guid:<guid>` or `[Type@]qn:<qualifiedName>`
    Process {
        #[arg(long)]
        name: String,
        #[arg(long)]
        connection: String,
        /// Caller-controlled process id
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long = "input")]
        inputs: Vec<String>,
        #[arg(long = "output")]
        outputs: Vec<String>,
    },
    /// Build a new hierarchical asset
    Create {
        #[arg(long)]
        type_name: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: String,
    },
    /// Reduce an asset JSON document to a relationship reference
    Reference {
        /// Asset JSON file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Generate placeholder GUIDs
    Placeholder {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = CliConfig::load(&args.config_dir, &args.environment)
        .context("Failed to load configuration")?;

    if let Some(scheme) = args.fingerprint_scheme {
        config.identity.fingerprint_scheme = scheme;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    telemetry::init(&config.logging);

    debug!(environment = %args.environment, "configuration loaded");

    let fingerprinter = config
        .identity
        .fingerprinter()
        .context("Invalid identity configuration")?;
    let guids = config.identity.guid_generator();

    let output = match args.command {
        Command::QualifiedName { type_name, name, parent } => {
            commands::qualified_name(&type_name, &name, &parent)?
        }
        Command::Connection { connector, epoch } => commands::connection(&connector, epoch),
        Command::Process {
            name,
            connection,
            id,
            parent,
            inputs,
            outputs,
        } => commands::process(
            &commands::ProcessArgs {
                name: &name,
                connection: &connection,
                id: id.as_deref(),
                parent: parent.as_deref(),
                inputs: &inputs,
                outputs: &outputs,
            },
            fingerprinter,
            guids.as_ref(),
        )?,
        Command::Create { type_name, name, parent } => {
            commands::create(&type_name, &name, &parent, guids.as_ref())?
        }
        Command::Reference { file } => commands::reference(file.as_deref())?,
        Command::Placeholder { count } => commands::placeholders(count, guids.as_ref()),
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
