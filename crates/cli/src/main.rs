//! Shopdeck CLI - migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! shopdeck migrate
//!
//! # Manage a store through the admin API
//! export SHOPDECK_TOKEN=sess_...
//! shopdeck store create --name "Summer Shop"
//! shopdeck size create --store <STORE_ID> --name Large --value L
//! shopdeck product list --store <STORE_ID>
//!
//! # Open a checkout
//! shopdeck checkout --store <STORE_ID> --product <PRODUCT_ID>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `store`, `billboard`, `category`, `color`, `size`, `product` -
//!   `create`, `update`, `delete` and `list`
//! - `checkout` - Open a hosted checkout session

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use url::Url;

use shopdeck_client::ApiClient;
use shopdeck_core::{ProductId, StoreId};

mod commands;
mod shell;

use commands::resources::{
    BillboardAction, CategoryAction, ProductAction, StoreAction, SwatchAction,
};

#[derive(Parser)]
#[command(name = "shopdeck")]
#[command(author, version, about = "Shopdeck store admin CLI")]
struct Cli {
    /// Admin API base URL
    #[arg(
        long,
        env = "SHOPDECK_API_URL",
        default_value = "http://localhost:3001",
        global = true
    )]
    api_url: Url,

    /// Session token issued by the auth provider
    #[arg(long, env = "SHOPDECK_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Manage billboards
    Billboard {
        #[command(subcommand)]
        action: BillboardAction,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage colors
    Color {
        #[command(subcommand)]
        action: SwatchAction,
    },
    /// Manage sizes
    Size {
        #[command(subcommand)]
        action: SwatchAction,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Open a hosted checkout for products
    Checkout {
        #[arg(short, long)]
        store: StoreId,
        /// Product to buy (repeat for several)
        #[arg(short, long = "product")]
        products: Vec<ProductId>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Commands::Migrate) {
        commands::migrate::run().await?;
        return Ok(());
    }

    let ctx = commands::Context {
        api: ApiClient::new(cli.api_url)?,
        token: cli.token.map(SecretString::from),
    };

    match cli.command {
        Commands::Migrate => {}
        Commands::Store { action } => commands::resources::store(&ctx, action).await?,
        Commands::Billboard { action } => commands::resources::billboard(&ctx, action).await?,
        Commands::Category { action } => commands::resources::category(&ctx, action).await?,
        Commands::Color { action } => commands::resources::color(&ctx, action).await?,
        Commands::Size { action } => commands::resources::size(&ctx, action).await?,
        Commands::Product { action } => commands::resources::product(&ctx, action).await?,
        Commands::Checkout { store, products } => {
            commands::checkout::run(&ctx, store, products).await?;
        }
    }
    Ok(())
}
