mod output;
mod scrape;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "alko-cli")]
#[command(about = "Scrape the alkoteka.com catalog into a JSON file")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every configured category (default)
    Scrape(ScrapeArgs),
    /// List the cities the storefront can be scraped for
    Cities,
}

/// Flags for `scrape`; each one overrides its `ALKO_*` environment setting.
#[derive(Debug, Default, Args)]
pub(crate) struct ScrapeArgs {
    /// City whose prices and stock to collect, e.g. "Москва"
    #[arg(long)]
    pub city: Option<String>,

    /// File with one category URL per line
    #[arg(long)]
    pub categories: Option<PathBuf>,

    /// File with one `host:port` proxy per line
    #[arg(long)]
    pub proxies: Option<PathBuf>,

    /// Where to write the JSON array of products
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Order products by URL instead of completion order
    #[arg(long)]
    pub sort: bool,

    /// Show what would be scraped without making any requests
    #[arg(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let args = match cli.command {
        Some(Commands::Cities) => {
            print_cities();
            return Ok(());
        }
        Some(Commands::Scrape(args)) => args,
        None => ScrapeArgs::default(),
    };

    let config = alko_core::load_app_config_with_overrides(&env_overrides(&args))?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    scrape::run_scrape(config, args).await
}

/// Flags that replace an `ALKO_*` variable before the config is validated.
fn env_overrides(args: &ScrapeArgs) -> Vec<(&'static str, &str)> {
    args.city
        .as_deref()
        .map(|city| ("ALKO_CITY", city))
        .into_iter()
        .collect()
}

fn print_cities() {
    for (name, id) in alko_core::CITIES {
        let marker = if *name == alko_core::DEFAULT_CITY {
            " (default)"
        } else {
            ""
        };
        println!("{name:<16} {id}{marker}");
    }
}
