use anyhow::Result;
use clap::Parser;
use indexer::{load_into, CorpusOptions};
use search_core::SearchIndex;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus to index at startup (file or directory)
    #[arg(long, default_value = "./books")]
    corpus: PathBuf,
    /// File extensions to load; repeat for several. Defaults to txt and jsonl
    #[arg(long = "ext")]
    extensions: Vec<String>,
    /// Maximum number of files to load
    #[arg(long)]
    limit: Option<usize>,
    /// Walk subdirectories too
    #[arg(long, default_value_t = false)]
    recursive: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut opts = CorpusOptions { limit: args.limit, recursive: args.recursive, ..CorpusOptions::default() };
    if !args.extensions.is_empty() {
        opts.extensions = args.extensions.clone();
    }
    let mut index = SearchIndex::new();
    load_into(&mut index, &args.corpus, &opts)?;
    let app = build_app(index);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
