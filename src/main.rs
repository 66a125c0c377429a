//! qpq CLI: build the vector index, then chat against it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qpq::application::services::{IndexParams, IndexProgress};
use qpq::application::{AnswerOptions, AnswerService, IndexService, RagService};
use qpq::domain::DomainError;
use qpq::infrastructure::config::{
    AppConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K,
};
use qpq::infrastructure::{data, DiskVectorClient, FastEmbedder, OpenRouterClient};

#[derive(Parser)]
#[command(name = "qpq")]
#[command(about = "Retrieval-augmented Persian QA over Quranic commentary texts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector index from text data
    BuildIndex {
        /// Directory containing source .txt files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Download default data files if they do not exist
        #[arg(long)]
        download_default_data: bool,

        /// Text chunk size in characters
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Chunk overlap in characters
        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        chunk_overlap: usize,

        /// Delete and recreate the target collection before indexing
        #[arg(long)]
        reset_collection: bool,

        /// Directory storing the vector index
        #[arg(long)]
        persist_dir: Option<PathBuf>,

        /// Collection name
        #[arg(long)]
        collection_name: Option<String>,

        /// Embedding model name
        #[arg(long)]
        embed_model: Option<String>,
    },

    /// Run interactive QA chat in the terminal
    Chat {
        /// Directory storing the vector index
        #[arg(long)]
        persist_dir: Option<PathBuf>,

        /// Collection name
        #[arg(long)]
        collection_name: Option<String>,

        /// Embedding model name
        #[arg(long)]
        embed_model: Option<String>,

        /// OpenRouter API key (falls back to OPENROUTER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// OpenRouter model id
        #[arg(long)]
        model: Option<String>,

        /// OpenRouter base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Number of chunks to retrieve per question
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qpq=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    match Cli::parse().command {
        Commands::BuildIndex {
            data_dir,
            download_default_data,
            chunk_size,
            chunk_overlap,
            reset_collection,
            persist_dir,
            collection_name,
            embed_model,
        } => {
            cmd_build_index(
                config,
                data_dir,
                download_default_data,
                IndexParams {
                    chunk_size,
                    chunk_overlap,
                },
                reset_collection,
                persist_dir,
                collection_name,
                embed_model,
            )
            .await
        }
        Commands::Chat {
            persist_dir,
            collection_name,
            embed_model,
            api_key,
            model,
            base_url,
            top_k,
        } => {
            cmd_chat(
                config,
                persist_dir,
                collection_name,
                embed_model,
                api_key,
                model,
                base_url,
                top_k,
            )
            .await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_build_index(
    config: AppConfig,
    data_dir: Option<PathBuf>,
    download_default_data: bool,
    params: IndexParams,
    reset_collection: bool,
    persist_dir: Option<PathBuf>,
    collection_name: Option<String>,
    embed_model: Option<String>,
) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or(config.data_dir);
    let persist_dir = persist_dir.unwrap_or(config.persist_dir);
    let collection_name = collection_name.unwrap_or(config.collection_name);
    let embed_model = embed_model.unwrap_or(config.embed_model);

    if download_default_data {
        data::download_default_data(&data_dir).await?;
    }

    let files = data::find_text_files(&data_dir)?;
    if files.is_empty() {
        anyhow::bail!(
            "No .txt files found in '{}'. Add data files or run with --download-default-data.",
            data_dir.display()
        );
    }

    let embedder = Arc::new(
        FastEmbedder::new(&embed_model)
            .with_context(|| format!("failed to load embedding model '{embed_model}'"))?,
    );

    let client = DiskVectorClient::open(&persist_dir)?;
    if reset_collection {
        client.delete_collection_if_exists(&collection_name)?;
    }
    let store = Arc::new(client.create_collection(&collection_name)?);

    let mut indexer = IndexService::new(embedder, store);

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    indexer.set_progress_callback(Box::new({
        let progress = progress.clone();
        move |event| match event {
            IndexProgress::Document { name, .. } => progress.set_message(name),
            IndexProgress::Chunks { .. } => progress.inc(1),
        }
    }));

    let stats = indexer.build_index(&files, params).await?;
    progress.finish_and_clear();

    println!("Index created at: {}", persist_dir.display());
    println!("Collection: {collection_name}");
    println!(
        "Documents indexed: {} ({} chunks)",
        stats.documents_indexed, stats.chunks_indexed
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_chat(
    config: AppConfig,
    persist_dir: Option<PathBuf>,
    collection_name: Option<String>,
    embed_model: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    top_k: usize,
) -> anyhow::Result<()> {
    let api_key = api_key.or(config.openrouter_api_key).ok_or_else(|| {
        DomainError::configuration(
            "OpenRouter API key not found. Set OPENROUTER_API_KEY or pass --api-key.",
        )
    })?;

    let persist_dir = persist_dir.unwrap_or(config.persist_dir);
    let collection_name = collection_name.unwrap_or(config.collection_name);
    let embed_model = embed_model.unwrap_or(config.embed_model);
    let model = model.unwrap_or(config.llm_model);
    let base_url = base_url.unwrap_or(config.openrouter_base_url);

    let client = DiskVectorClient::open_existing(&persist_dir)?;
    let store = Arc::new(client.collection(&collection_name)?);
    let embedder = Arc::new(
        FastEmbedder::new(&embed_model)
            .with_context(|| format!("failed to load embedding model '{embed_model}'"))?,
    );

    let rag = RagService::new(embedder, store);
    let llm = Arc::new(OpenRouterClient::new(api_key, base_url, model));
    let service = AnswerService::new(rag, llm);
    let options = AnswerOptions {
        top_k,
        ..AnswerOptions::default()
    };

    println!("Interactive mode. Type 'quit' to exit.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nسوال شما: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nExiting chat.");
            return Ok(());
        };
        let line = line?;
        let query = line.trim();

        if query.eq_ignore_ascii_case("quit")
            || query.eq_ignore_ascii_case("exit")
            || query == "خروج"
        {
            println!("Exiting chat.");
            return Ok(());
        }

        // One question in flight at a time; a failed one is printed and the
        // loop carries on.
        match service.answer(query, &options).await {
            Ok(response) => println!("\nپاسخ:\n{response}"),
            Err(e) => eprintln!("Error while generating answer: {e}"),
        }
    }
}
