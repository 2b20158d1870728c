use crate::cart::{is_valid_price, ProductId};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront cart, recommendations and assistant chat", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or change the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Show products recommended alongside a product
    Recommend {
        product_id: ProductId,

        /// Number of recommendations (default from config)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show trending products
    Trending {
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Talk to the shop assistant; interactive when no message is given
    Chat { message: Option<String> },

    /// Print the URL the search form redirects to
    Search { query: String },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// List line items and the total
    Show,

    /// Add one unit of a product
    Add {
        id: ProductId,
        name: String,

        #[arg(value_parser = parse_price)]
        price: f64,
    },

    /// Remove a product entirely
    Remove { id: ProductId },

    /// Set a quantity; zero or less removes the product
    Update {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Print the cart total
    Total,

    /// Empty the cart
    Clear,
}

/// Prices that can be stored in the cart's JSON
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if is_valid_price(price) {
        Ok(price)
    } else {
        Err(format!("'{}' is not a finite, non-negative price", s))
    }
}
