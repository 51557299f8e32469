use anyhow::{bail, Context, Result};
use clap::Parser;
use crawler::{book_page_url, parse_book_page, sanitize_title, FetchOutcome, SkipReason};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Download plain-text books from Project Gutenberg into a directory")]
struct Cli {
    /// Site root to fetch catalogue pages from
    #[arg(long, default_value = "https://www.gutenberg.org")]
    base_url: String,
    /// First ebook id (inclusive)
    #[arg(long, default_value_t = 1)]
    start: u32,
    /// Last ebook id (exclusive)
    #[arg(long, default_value_t = 1000)]
    end: u32,
    /// Directory to write `<title>.txt` files into
    #[arg(long, default_value = "./books")]
    output: PathBuf,
    /// Number of books fetched at once
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// User-Agent string sent with every request
    #[arg(long, default_value = "tfidf-search-crawler/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    if args.start >= args.end {
        bail!("empty id range {}..{}", args.start, args.end);
    }
    tokio::fs::create_dir_all(&args.output)
        .await
        .with_context(|| format!("creating {}", args.output.display()))?;

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    tracing::info!(start = args.start, end = args.end, concurrency = args.concurrency, output = %args.output.display(), "crawl starting");

    let mut ids = args.start..args.end;
    let mut tasks: JoinSet<FetchOutcome> = JoinSet::new();
    let (mut saved, mut skipped) = (0usize, 0usize);

    loop {
        while tasks.len() < args.concurrency.max(1) {
            let Some(id) = ids.next() else { break };
            let client = client.clone();
            let base = args.base_url.clone();
            let output = args.output.clone();
            tasks.spawn(async move { fetch_book(&client, &base, id, &output).await });
        }
        let Some(joined) = tasks.join_next().await else { break };
        match joined {
            Ok(FetchOutcome::Saved { id, path, bytes }) => {
                saved += 1;
                tracing::info!(id, path = %path.display(), bytes, "saved book");
            }
            Ok(FetchOutcome::Skipped { id, reason }) => {
                skipped += 1;
                tracing::warn!(id, %reason, "skipped book");
            }
            Err(err) => {
                skipped += 1;
                tracing::warn!(%err, "fetch task failed");
            }
        }
    }

    tracing::info!(saved, skipped, output = %args.output.display(), "crawl complete");
    Ok(())
}

async fn fetch_book(client: &Client, base: &str, id: u32, output: &Path) -> FetchOutcome {
    match try_fetch_book(client, base, id, output).await {
        Ok((path, bytes)) => FetchOutcome::Saved { id, path, bytes },
        Err(reason) => FetchOutcome::Skipped { id, reason },
    }
}

async fn try_fetch_book(client: &Client, base: &str, id: u32, output: &Path) -> Result<(PathBuf, usize), SkipReason> {
    let page_url = book_page_url(base, id)?;
    let html = get_text(client, page_url.clone()).await?;
    let page = parse_book_page(&html, &page_url)?;
    let text = get_text(client, page.text_url).await?;
    if text.is_empty() {
        return Err(SkipReason::EmptyText);
    }
    let path = output.join(format!("{}.txt", sanitize_title(&page.title)));
    tokio::fs::write(&path, &text).await.map_err(|e| SkipReason::Write(e.to_string()))?;
    Ok((path, text.len()))
}

async fn get_text(client: &Client, url: Url) -> Result<String, SkipReason> {
    let resp = client.get(url).send().await.map_err(|e| SkipReason::Http(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(SkipReason::Status(resp.status().as_u16()));
    }
    resp.text().await.map_err(|e| SkipReason::Http(e.to_string()))
}
