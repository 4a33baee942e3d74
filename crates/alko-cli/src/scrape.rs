//! The `scrape` command: load inputs, run the pipeline, write the output.

use std::io::ErrorKind;
use std::path::Path;

use alko_core::{AppConfig, ConfigError, ProxyEndpoint};
use alko_scraper::{run_pipeline, AlkotekaClient, CategoryStatus, ClientSettings};
use anyhow::Context;

use crate::output::{sort_by_url, write_aggregate};
use crate::ScrapeArgs;

/// Applies command-line overrides on top of the environment config.
///
/// # Errors
///
/// Returns an error if `--city` names a city the storefront does not know.
pub(crate) fn apply_overrides(mut config: AppConfig, args: &ScrapeArgs) -> anyhow::Result<AppConfig> {
    if let Some(city) = args.city.as_deref() {
        let id = alko_core::city_id(city).with_context(|| {
            let known: Vec<&str> = alko_core::CITIES.iter().map(|(name, _)| *name).collect();
            format!("unknown city \"{city}\"; known cities: {}", known.join(", "))
        })?;
        city.trim().clone_into(&mut config.city_name);
        id.clone_into(&mut config.city_id);
    }
    if let Some(path) = &args.categories {
        config.categories_path.clone_from(path);
    }
    if let Some(path) = &args.proxies {
        config.proxies_path.clone_from(path);
    }
    if let Some(path) = &args.output {
        config.output_path.clone_from(path);
    }
    Ok(config)
}

/// Loads the proxy list; a missing file means no proxies.
fn load_proxy_pool(path: &Path) -> anyhow::Result<Vec<ProxyEndpoint>> {
    match alko_core::load_proxies(path) {
        Ok(proxies) => Ok(proxies),
        Err(ConfigError::InputFileIo { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "proxy list not found, connecting directly");
            Ok(Vec::new())
        }
        Err(e) => Err(e).context("failed to load proxy list"),
    }
}

/// Runs a full scrape and writes the aggregate.
///
/// Item and category failures are logged and counted but never fail the
/// command; only setup and output errors do.
///
/// # Errors
///
/// Returns an error if an input file cannot be loaded, the HTTP client cannot
/// be built, or the output file cannot be written.
pub(crate) async fn run_scrape(config: AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;

    let categories = alko_core::load_categories(&config.categories_path)
        .context("failed to load category list")?;
    let proxies = load_proxy_pool(&config.proxies_path)?;

    if args.dry_run {
        println!(
            "dry-run: would scrape {} categor{} for {} through {}:",
            categories.len(),
            if categories.len() == 1 { "y" } else { "ies" },
            config.city_name,
            if proxies.is_empty() {
                "a direct connection".to_string()
            } else {
                format!("{} proxies", proxies.len())
            },
        );
        for category in &categories {
            println!("  {:<32} {}", category.slug, category.url);
        }
        println!("output: {}", config.output_path.display());
        return Ok(());
    }

    tracing::info!(
        city = %config.city_name,
        categories = categories.len(),
        proxies = proxies.len(),
        max_concurrent_requests = config.max_concurrent_requests,
        "starting scrape"
    );

    let client = AlkotekaClient::new(ClientSettings::from_config(&config, proxies))
        .context("failed to build HTTP client")?;
    let mut report = run_pipeline(&client, &categories, &config.city_id).await;

    if args.sort {
        sort_by_url(&mut report.records);
    }
    write_aggregate(&config.output_path, &report.records)?;

    for category in &report.categories {
        match &category.status {
            CategoryStatus::Completed | CategoryStatus::Empty => println!(
                "  \u{2713} {:<32} {:>5} listed {:>5} fetched {:>5} failed",
                category.slug, category.listed, category.fetched, category.failed
            ),
            CategoryStatus::ListingFailed(reason) => {
                println!("  \u{2717} {:<32} {reason}", category.slug);
            }
        }
    }
    println!(
        "Wrote {} products to {}",
        report.records.len(),
        config.output_path.display()
    );

    Ok(())
}
