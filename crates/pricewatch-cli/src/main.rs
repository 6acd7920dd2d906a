mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricewatch_core::{AppConfig, ProductRef, Store};
use pricewatch_scraper::{detect_store, Extractor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Extract prices and stock status from online store product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the store a product URL belongs to
    Detect { url: String },
    /// Extract a single product page
    Scrape {
        url: String,
        /// Name reported when the page has none
        #[arg(long)]
        name: Option<String>,
        /// Skip URL-based store detection
        #[arg(long)]
        store: Option<Store>,
        #[arg(long)]
        json: bool,
    },
    /// Extract every active product in the products file once
    Check {
        /// Overrides PRICEWATCH_PRODUCTS_PATH
        #[arg(long)]
        products: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Run `check` every CHECK_INTERVAL_HOURS until interrupted
    Watch {
        #[arg(long)]
        products: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricewatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Detect { url } => println!("{}", detect_store(&url)),
        Commands::Scrape {
            url,
            name,
            store,
            json,
        } => {
            let product = ProductRef {
                store,
                ..ProductRef::ad_hoc(name.unwrap_or_else(|| url.clone()), url)
            };
            let result = Extractor::from_config(&config).extract(&product).await;
            check::print_results(std::slice::from_ref(&result), json)?;
        }
        Commands::Check { products, json } => {
            let path = products_path(&config, products);
            check::check_once(&config, &Extractor::from_config(&config), &path, json).await?;
        }
        Commands::Watch { products, json } => {
            let path = products_path(&config, products);
            watch(&config, &path, json).await?;
        }
    }

    Ok(())
}

fn products_path(config: &AppConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| config.products_path.clone())
}

/// Repeats a check pass on a fixed interval. The products file is re-read
/// every pass so edits apply without a restart. Ctrl-C cancels an in-flight
/// pass as well as the wait between passes.
async fn watch(config: &AppConfig, path: &std::path::Path, json: bool) -> anyhow::Result<()> {
    let extractor = Extractor::from_config(config);
    let mut interval = tokio::time::interval(config.check_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(
        interval_hours = config.check_interval_hours,
        path = %path.display(),
        "watch started"
    );

    loop {
        let pass = async {
            interval.tick().await;
            check::check_once(config, &extractor, path, json).await
        };

        tokio::select! {
            result = pass => {
                if let Err(e) = result {
                    // A broken products file should not end the watch; it may be fixed before the next pass.
                    tracing::error!(error = %e, "check pass failed");
                }
            }
            _ = &mut shutdown => {
                tracing::info!("interrupted; stopping watch");
                break;
            }
        }
    }

    Ok(())
}
