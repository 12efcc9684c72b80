//! GLOWISHII CLI - session store migration and shop operations.
//!
//! # Usage
//!
//! ```bash
//! # Create the session store schema
//! gw-cli migrate
//!
//! # Print the catalog
//! gw-cli products list --category Jar
//!
//! # Print orders (needs an admin API session cookie)
//! GLOWISHII_API_COOKIE='token=...' gw-cli orders list --status Placed
//!
//! # Move an order along
//! GLOWISHII_API_COOKIE='token=...' gw-cli orders set-status 65f1c0ffee Shipped
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session store schema
//! - `products list` - Print the catalog
//! - `orders list` - Print every order
//! - `orders set-status` - Change an order's status

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gw-cli")]
#[command(author, version, about = "GLOWISHII storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session store schema
    Migrate,
    /// Inspect the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect and update orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Print every product
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Print every order, newest first
    List {
        /// Only orders with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Move an order to a new status
    SetStatus {
        /// Order id
        id: String,

        /// New status (Placed, Processing, Shipped, Delivered, Cancelled)
        status: String,
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
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Products { action } => match action {
            ProductAction::List { category } => {
                commands::products::list(category.as_deref()).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List { status } => commands::orders::list(status.as_deref()).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&id, &status).await?;
            }
        },
    }
    Ok(())
}
