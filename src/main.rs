//! olist-ask - ask analytics questions about the Olist dataset in plain language.

use std::sync::Arc;

use olist_ask::cli::Cli;
use olist_ask::config::Config;
use olist_ask::db::SqliteConnector;
use olist_ask::error::Result;
use olist_ask::llm::{create_client, QueryGenerator};
use olist_ask::logging;
use olist_ask::pipeline::Pipeline;
use olist_ask::query::QueryExecutor;
use olist_ask::questions::default_questions;
use olist_ask::report::ConsoleReporter;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e.detail());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Precedence: CLI arguments, then config file, then defaults
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let client = create_client(&config.llm)?;
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        database = %config.database.path.display(),
        "Starting"
    );

    let connector = SqliteConnector::new(&config.database.path)
        .read_only(!config.database.allow_writes);
    let executor =
        QueryExecutor::new(Arc::new(connector)).allow_writes(config.database.allow_writes);
    let pipeline = Pipeline::new(QueryGenerator::new(client), executor);

    let questions = config.questions.unwrap_or_else(default_questions);
    let mut reporter = ConsoleReporter::stdio();
    pipeline.run(&questions, &mut reporter).await?;

    Ok(())
}
