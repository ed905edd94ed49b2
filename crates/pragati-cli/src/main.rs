//! Pragati CLI - operator interface for the district scheme knowledge base.

use clap::Parser;
use pragati_cli::{commands, Cli, Command, Config, Formatter, OutputFormat};
use pragati_extractor::{ChatService, ExtractionPipeline};
use pragati_llm::CompletionsClient;
use pragati_store::SqliteStore;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pragati_cli::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(OutputFormat::Table);
    let formatter = Formatter::new(format, !cli.no_color);

    let store = Arc::new(Mutex::new(SqliteStore::new(&config.database_path)?));

    match cli.command {
        Command::District(args) => {
            commands::execute_district(args.action, &store, &formatter)?;
        }
        Command::Latest(args) => {
            commands::execute_latest(args, &store, &formatter)?;
        }
        Command::History(args) => {
            commands::execute_history(args, &store, &formatter)?;
        }
        Command::Analytics(args) => {
            commands::execute_analytics(args, &store, &formatter)?;
        }
        Command::Categories => {
            commands::execute_categories(&store, &formatter)?;
        }
        Command::Ingest(args) => {
            let pipeline = build_pipeline(&config, &store)?;
            commands::execute_ingest(args, &store, &pipeline, &formatter).await?;
        }
        Command::Extract(args) => {
            let pipeline = build_pipeline(&config, &store)?;
            commands::execute_extract(args, &pipeline, &formatter).await?;
        }
        Command::Chat(args) => {
            let chat = ChatService::new(build_client(&config)?, Arc::clone(&store), &config.extractor);
            commands::execute_chat(args, &chat, &formatter).await?;
        }
    }

    Ok(())
}

fn build_client(config: &Config) -> pragati_cli::Result<Arc<CompletionsClient>> {
    let client = CompletionsClient::new(
        &config.llm.endpoint,
        &config.llm.api_key,
        &config.llm.model,
    )?
    .with_max_retries(config.llm.max_retries);
    Ok(Arc::new(client))
}

fn build_pipeline(
    config: &Config,
    store: &Arc<Mutex<SqliteStore>>,
) -> pragati_cli::Result<ExtractionPipeline<CompletionsClient, SqliteStore>> {
    let pipeline = ExtractionPipeline::new(
        build_client(config)?,
        Arc::clone(store),
        config.extractor.clone(),
    )?;
    Ok(pipeline)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pragati=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
