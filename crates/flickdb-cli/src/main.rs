use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flickdb_catalog::{
    fill_movie_details, search_and_save, EnrichOutcome, GuardPolicy, PgCatalog, SearchOutcome,
};
use flickdb_omdb::OmdbClient;

#[derive(Debug, Parser)]
#[command(name = "flickdb")]
#[command(about = "Movie catalog backed by the OMDb API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search OMDb for a title and save the results as partial records.
    Search {
        query: String,
        /// Search again even if this term was queried in the last 24 hours.
        #[arg(long)]
        force: bool,
    },
    /// Fetch full details for a movie by IMDb ID.
    Enrich { imdb_id: String },
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = flickdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let pool_config = flickdb_db::PoolConfig::from_app_config(&config);
    let pool = flickdb_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to the database")?;

    if matches!(cli.command, Commands::Migrate) {
        let applied = flickdb_db::run_migrations(&pool).await?;
        println!("applied {applied} migration(s)");
        return Ok(());
    }

    let api_key = config
        .omdb_api_key
        .as_deref()
        .context("OMDB_API_KEY is not set")?;
    let client = OmdbClient::with_base_url(api_key, config.omdb_timeout_secs, &config.omdb_base_url)?;
    let store = PgCatalog::new(pool);

    match cli.command {
        Commands::Search { query, force } => {
            let mut policy = GuardPolicy::from_config(&config);
            policy.allow_rescrape = policy.allow_rescrape || force;

            match search_and_save(&store, &client, &query, policy).await? {
                SearchOutcome::Skipped => {
                    println!("'{query}' was searched in the last 24 hours; pass --force to repeat");
                }
                SearchOutcome::Completed { processed, created } => {
                    println!("processed {processed} result(s), {created} new");
                }
            }
        }
        Commands::Enrich { imdb_id } => {
            match fill_movie_details(&store, &client, Some(&client), &imdb_id).await? {
                EnrichOutcome::NotFound => println!("no movie with IMDb ID {imdb_id}"),
                EnrichOutcome::AlreadyFull => println!("{imdb_id} is already a full record"),
                EnrichOutcome::NoData => println!("no details available for {imdb_id}"),
                EnrichOutcome::Updated => println!("{imdb_id} updated with full details"),
            }
        }
        Commands::Migrate => unreachable!("handled above"),
    }

    Ok(())
}
