use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinerank::{
    api::{create_router, AppState},
    client::{
        render::render_session, repl::run_repl, DatasetSource, FileDatasetSource,
        HttpDatasetSource, Session,
    },
    config::Config,
    models::FilterState,
    services::{publisher::read_dataset, run_merge, run_publish, GenreKeywordPolicy, MergeRequest},
};

#[derive(Parser)]
#[command(name = "cinerank", version, about = "Weighted movie recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merges the four component score tables into the final ranking
    Merge(MergeArgs),
    /// Joins the ranking with movie metadata into the published JSON dataset
    Publish(PublishArgs),
    /// Serves the published dataset over HTTP
    Serve(ServeArgs),
    /// Browses the published dataset in the terminal
    Browse(BrowseArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Number of movies in the top recommendations file
    #[arg(long = "top_n", alias = "top-n", default_value_t = 20, allow_negative_numbers = true)]
    top_n: i64,

    #[arg(long)]
    content_weight: Option<f64>,
    #[arg(long)]
    rating_weight: Option<f64>,
    #[arg(long)]
    business_weight: Option<f64>,
    #[arg(long)]
    time_weight: Option<f64>,

    /// Min-max normalize each component before weighting
    #[arg(long)]
    normalize: bool,

    #[arg(long)]
    tables_dir: Option<PathBuf>,
    #[arg(long)]
    logs_dir: Option<PathBuf>,
}

#[derive(Args)]
struct PublishArgs {
    #[arg(long)]
    tables_dir: Option<PathBuf>,
    /// CSV export of the movie metadata
    #[arg(long)]
    metadata: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Published dataset to serve
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[derive(Args)]
struct BrowseArgs {
    /// Dataset URL, fetched once
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Read the dataset from a local file instead of HTTP
    #[arg(long)]
    file: Option<PathBuf>,

    #[arg(long, default_value_t = cinerank::models::ADULT_AGE)]
    min_age: u32,
    /// Original language code, or "all"
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Open the line-editing browser
    #[arg(long, short)]
    interactive: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinerank=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    match cli.command {
        Command::Merge(args) => merge(args, &config),
        Command::Publish(args) => publish(args, &config),
        Command::Serve(args) => serve(args, &config).await,
        Command::Browse(args) => browse(args, &config).await,
    }
}

fn merge(args: MergeArgs, config: &Config) -> anyhow::Result<()> {
    let request = MergeRequest {
        tables_dir: args.tables_dir.unwrap_or_else(|| config.tables_dir.clone()),
        logs_dir: args.logs_dir.unwrap_or_else(|| config.logs_dir.clone()),
        weights: config.weights().with_overrides(
            args.content_weight,
            args.rating_weight,
            args.business_weight,
            args.time_weight,
        ),
        normalize: args.normalize,
        top_n: args.top_n,
    };

    let (outcome, artifacts) = run_merge(&request)?;
    println!("Ranked {} movies.", outcome.records.len());
    println!("Full ranking: {}", artifacts.full_ranking.display());
    println!("Top {}: {}", outcome.top_n, artifacts.top_ranking.display());
    println!("Log: {}", artifacts.log.display());
    Ok(())
}

fn publish(args: PublishArgs, config: &Config) -> anyhow::Result<()> {
    let tables_dir = args.tables_dir.unwrap_or_else(|| config.tables_dir.clone());
    let metadata = args.metadata.unwrap_or_else(|| config.metadata_path.clone());
    let output = args.output.unwrap_or_else(|| config.dataset_path.clone());
    let policy = GenreKeywordPolicy::with_keywords(config.restricted_keywords());

    let dataset = run_publish(&tables_dir, &metadata, &output, &policy)?;
    println!(
        "Published {} movies to {}",
        dataset.metadata.total_movies,
        output.display()
    );
    Ok(())
}

async fn serve(args: ServeArgs, config: &Config) -> anyhow::Result<()> {
    let dataset_path = args.dataset.unwrap_or_else(|| config.dataset_path.clone());
    let dataset = read_dataset(&dataset_path)?;
    tracing::info!(
        path = %dataset_path.display(),
        movies = dataset.movies.len(),
        "Dataset loaded"
    );

    let app = create_router(AppState::new(dataset, config.page_size));

    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn browse(args: BrowseArgs, config: &Config) -> anyhow::Result<()> {
    let source: Box<dyn DatasetSource> = match args.file {
        Some(path) => Box::new(FileDatasetSource::new(path)),
        None => Box::new(HttpDatasetSource::new(
            args.url.unwrap_or_else(|| config.dataset_url.clone()),
        )),
    };

    let filter = FilterState::from_input(
        args.min_age,
        args.language.as_deref(),
        args.search.as_deref(),
    );
    let session = Session::open(source.as_ref(), config.page_size, filter, args.page).await;

    if args.interactive {
        return tokio::task::spawn_blocking(move || run_repl(session)).await?;
    }

    // A failed fetch renders as the empty state, not a command failure
    print!("{}", render_session(&session));
    Ok(())
}
