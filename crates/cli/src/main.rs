//! `owlset`: index a repository into a call graph and query it.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod command;
mod config;
mod render;

use command::CommandContext;
use config::{AppConfig, DATABASE_ENV};

#[derive(Parser)]
#[command(name = "owlset", version)]
#[command(about = "Index a repository into a queryable call graph", long_about = None)]
struct Cli {
    /// Config file (defaults to ./owlset.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Graph database path, overrides OWLSET_DB and the config file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a repository and store its call graph
    Scan {
        /// Repository root
        root: PathBuf,
    },
    /// Fill in missing function summaries through the chat API
    Summarize,
    /// Show what a definition calls and who calls it
    Context {
        /// Node id, e.g. `src/util.py::helper`
        id: String,
        #[arg(long, conflicts_with = "dot")]
        json: bool,
        /// Emit a Graphviz ego graph instead of text
        #[arg(long)]
        dot: bool,
    },
    /// List functions, optionally filtered by `<file> :: <name>` label
    Functions {
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Export the function call graph
    Graph {
        #[arg(long, value_enum, default_value_t = GraphFormat::Json)]
        format: GraphFormat,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Ask a question about a definition
    Ask {
        id: String,
        #[arg(required = true)]
        question: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Json,
    Dot,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let env_db = std::env::var(DATABASE_ENV).ok();
    let db_path = config.database_path(cli.db.as_deref(), env_db.as_deref());
    log::debug!("Using graph database {}", db_path.display());

    let ctx = CommandContext::new(config, db_path);
    command::execute(cli.command, &ctx).await
}
