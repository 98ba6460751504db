mod assistant;
mod query;
mod scan;

use crate::config::AppConfig;
use crate::Commands;
use anyhow::{Context as _, Result};
use owlset_assistant::ChatClient;
use owlset_graph::GraphService;
use owlset_store::SqliteGraphStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Settings and resources shared by every subcommand
pub struct CommandContext {
    pub config: AppConfig,
    pub db_path: PathBuf,
}

impl CommandContext {
    pub fn new(config: AppConfig, db_path: PathBuf) -> Self {
        Self { config, db_path }
    }

    pub fn open_store(&self) -> Result<Arc<SqliteGraphStore>> {
        let store = SqliteGraphStore::open(&self.db_path)
            .with_context(|| format!("Failed to open graph database {}", self.db_path.display()))?;
        Ok(Arc::new(store))
    }

    pub fn graph_service(&self) -> Result<GraphService> {
        let store = self.open_store()?;
        GraphService::new(store).context("Failed to load the call graph")
    }

    pub fn chat_client(&self) -> Result<Arc<ChatClient>> {
        Ok(Arc::new(ChatClient::from_config(&self.config.assistant)?))
    }
}

pub async fn execute(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Scan { root } => scan::run(ctx, &root),
        Commands::Summarize => assistant::summarize(ctx).await,
        Commands::Context { id, json, dot } => query::context(ctx, &id, json, dot),
        Commands::Functions { filter } => query::functions(ctx, filter.as_deref()),
        Commands::Graph { format, output } => query::graph(ctx, format, output.as_deref()),
        Commands::Ask { id, question } => assistant::ask(ctx, &id, &question.join(" ")).await,
    }
}
