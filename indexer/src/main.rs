use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indexer::{load_into, CorpusOptions};
use search_core::{SearchHit, SearchIndex, DEFAULT_TOP_N};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory TF-IDF index over a corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (file or directory)
    #[arg(long)]
    input: PathBuf,
    /// File extensions to load; repeat for several. Defaults to txt and jsonl
    #[arg(long = "ext")]
    extensions: Vec<String>,
    /// Maximum number of files to load
    #[arg(long)]
    limit: Option<usize>,
    /// Walk subdirectories too
    #[arg(long, default_value_t = false)]
    recursive: bool,
}

impl CorpusArgs {
    fn options(&self) -> CorpusOptions {
        let mut opts = CorpusOptions { limit: self.limit, recursive: self.recursive, ..CorpusOptions::default() };
        if !self.extensions.is_empty() {
            opts.extensions = self.extensions.clone();
        }
        opts
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Index the corpus and print the top results for a query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Free-text query
        #[arg(long, short)]
        query: String,
        /// Number of results
        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
        /// Print results as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Index the corpus and print its statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, n, json } => {
            let mut index = SearchIndex::new();
            load_into(&mut index, &corpus.input, &corpus.options())?;
            let hits = index.search(&query, n);
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                print_hits(&hits);
            }
            Ok(())
        }
        Commands::Stats { corpus } => {
            let mut index = SearchIndex::new();
            let report = load_into(&mut index, &corpus.input, &corpus.options())?;
            println!("files:     {}", report.files);
            println!("documents: {}", index.num_docs());
            println!("terms:     {}", index.num_terms());
            println!("skipped:   {}", report.skipped);
            Ok(())
        }
    }
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("no results");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>3}  {:>10.6}  {} (doc {})", rank, hit.score, hit.name, hit.doc_id);
    }
}
