use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use collab_search::{Dependencies, LogFormat, Settings};
use collab_search_shared::{Principal, SearchInput};

#[derive(Parser)]
#[command(name = "collab-search")]
#[command(
    about = "Index lifecycle, batch ingestion and search for collaboration data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every search index that does not exist yet
    EnsureIndices,
    /// Delete every existing search index
    RemoveIndices,
    /// Ingest all sources into the search indices
    Ingest,
    /// Rebuild every index from scratch and swap the aliases over
    Reindex,
    /// Run a term search
    Search {
        /// Search term; repeat for several terms
        #[arg(long = "term", required = true)]
        terms: Vec<String>,

        /// Entity type filter; repeat for several types
        #[arg(long = "type")]
        types: Vec<String>,

        /// Tagset name whose tags take part in matching
        #[arg(long = "tagset")]
        tagsets: Vec<String>,

        /// Restrict the search to one space
        #[arg(long)]
        space: Option<Uuid>,

        /// Search on behalf of this user instead of anonymously
        #[arg(long)]
        as_user: Option<Uuid>,
    },
    /// Run a full-text search against the search indices
    SearchIndex {
        /// Search term; repeat for several terms
        #[arg(long = "term", required = true)]
        terms: Vec<String>,

        /// Entity type filter; repeat for several types
        #[arg(long = "type")]
        types: Vec<String>,

        /// Restrict the search to one level-zero space
        #[arg(long)]
        space: Option<Uuid>,

        /// Search only the indices visible without authorization
        #[arg(long)]
        public_only: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    let dependencies = Dependencies::new(&settings).await?;

    let output: Value = match cli.command {
        Commands::EnsureIndices => {
            serde_json::to_value(dependencies.ingest.ensure_indices_exist().await)?
        }
        Commands::RemoveIndices => {
            serde_json::to_value(dependencies.ingest.remove_indices().await)?
        }
        Commands::Ingest => {
            let task_id = dependencies.tasks.create_task().await;
            info!(task_id = %task_id, "Starting ingest task");
            let report = dependencies.ingest.ingest(task_id).await;
            let task = dependencies.tasks.get(task_id).await;
            serde_json::json!({ "report": report, "task": task })
        }
        Commands::Reindex => {
            let task_id = dependencies.tasks.create_task().await;
            info!(task_id = %task_id, "Starting ingest from scratch");
            let report = dependencies.ingest.ingest_from_scratch(task_id).await;
            let task = dependencies.tasks.get(task_id).await;
            serde_json::json!({ "report": report, "task": task })
        }
        Commands::Search {
            terms,
            types,
            tagsets,
            space,
            as_user,
        } => {
            let input = SearchInput {
                terms,
                types_filter: types,
                tagset_names: tagsets,
                search_in_space_filter: space,
            };
            let principal = match as_user {
                Some(user_id) => dependencies
                    .principal_for(user_id)
                    .await
                    .with_context(|| format!("Cannot search as user {}", user_id))?,
                None => Principal::anonymous(),
            };
            let results = dependencies.search.search(&input, &principal).await?;
            serde_json::to_value(results)?
        }
        Commands::SearchIndex {
            terms,
            types,
            space,
            public_only,
        } => {
            let input = SearchInput {
                terms,
                types_filter: types,
                tagset_names: Vec::new(),
                search_in_space_filter: space,
            };
            let results = dependencies.index_search.search(&input, public_only).await?;
            serde_json::to_value(results)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
