//! Parisa CLI - search the catalog and shop from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalog
//! parisa search persian turquoise
//!
//! # Manage the local cart
//! parisa cart add kal-ring-001
//! parisa cart update kal-ring-001 2
//! parisa cart show
//!
//! # Validate the cart with the storefront
//! parisa cart checkout
//! ```
//!
//! # Environment Variables
//!
//! - `PARISA_STOREFRONT_URL` - Storefront base URL (default: http://127.0.0.1:3000)
//! - `PARISA_CART_DIR` - Directory holding the cart file (default: .parisa)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod client;
mod commands;
mod storage;

use client::StorefrontClient;
use storage::FileStorage;

#[derive(Parser)]
#[command(name = "parisa")]
#[command(author, version, about = "Parisa London storefront CLI")]
struct Cli {
    /// Storefront base URL
    #[arg(long, env = "PARISA_STOREFRONT_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Directory holding the cart file
    #[arg(long, env = "PARISA_CART_DIR", default_value = ".parisa")]
    cart_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },
    /// Set a product's quantity (0 removes it)
    Update {
        /// Product id
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Validate the cart with the storefront
    Checkout,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = StorefrontClient::new(&cli.url)?;
    let storage = FileStorage::new(cli.cart_dir);
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Search { query } => {
            commands::search::run(&client, &query.join(" "), &mut out).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => {
                let (cart, _) = commands::cart::open_with_notices(storage);
                commands::cart::show(&cart, &mut out)?;
            }
            CartAction::Add { id } => {
                commands::cart::add(storage, &client, &id, &mut out).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(storage, &id, &mut out)?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(storage, &id, quantity, &mut out)?;
            }
            CartAction::Clear => commands::cart::clear(storage, &mut out)?,
            CartAction::Checkout => {
                commands::cart::checkout(storage, &client, &mut out).await?;
            }
        },
    }

    out.flush()?;
    Ok(())
}
