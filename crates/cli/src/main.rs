//! Cartwheel CLI - drive the cart store from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product
//! cartwheel add 1
//!
//! # Set an exact quantity
//! cartwheel update 1 3
//!
//! # Remove a product
//! cartwheel remove 1
//!
//! # Print the cart
//! cartwheel show
//! ```
//!
//! Requires `CATALOG_BASE_URL` in the environment (or a `.env` file); the
//! cart slot defaults to `cartwheel-cart.json` and can be moved with
//! `CART_STORAGE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartwheel_core::{CartEntry, Price, ProductId};
use cartwheel_store::cart::CartStore;
use cartwheel_store::catalog::CatalogClient;
use cartwheel_store::config::StoreConfig;
use cartwheel_store::notify::TracingNotifier;
use cartwheel_store::storage::JsonFileStorage;

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Cartwheel cart driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Catalog product id
        product_id: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product id
        product_id: i64,
    },
    /// Set a product's quantity to an exact amount
    Update {
        /// Catalog product id
        product_id: i64,
        /// Target quantity (must be covered by stock)
        amount: u32,
    },
    /// Print the current cart
    Show,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn print_cart(cart: &[CartEntry]) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    let mut subtotal = Price::from_cents(0);
    for entry in cart {
        let line_total = entry.line_total();
        subtotal = subtotal.plus(line_total);
        println!(
            "{:>6}  {:<32} {:>3} x {:>9} = {:>10}",
            entry.id,
            entry.title,
            entry.amount,
            entry.price.display(),
            line_total.display(),
        );
    }
    println!("{:>59} {:>10}", "subtotal:", subtotal.display());
}

async fn run(cli: Cli, config: StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogClient::new(&config.catalog_base_url);
    let storage = JsonFileStorage::new(&config.storage_path);
    let store = CartStore::open(catalog, storage, TracingNotifier).await?;

    match cli.command {
        Commands::Add { product_id } => {
            store.add_product(ProductId::new(product_id)).await?;
        }
        Commands::Remove { product_id } => {
            store.remove_product(ProductId::new(product_id)).await?;
        }
        Commands::Update { product_id, amount } => {
            store
                .update_product_amount(ProductId::new(product_id), amount)
                .await?;
        }
        Commands::Show => {}
    }

    print_cart(&store.cart());
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartwheel=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
