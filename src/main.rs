use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use storefront::cli::{CartAction, Cli, Commands};
use storefront::search::search_url;
use storefront::utils::{self, TerminalBadge, TerminalNotifier};
use storefront::{CartStore, ChatOutcome, ChatPanel, Settings, Storefront};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse first so --help and usage errors never load config or storage
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        utils::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::new()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let shop = Storefront::new(settings)?;

    match cli.command {
        Commands::Cart { action } => {
            let mut cart = shop.open_cart(Arc::new(TerminalBadge), Arc::new(TerminalNotifier))?;
            handle_cart(&mut cart, action)
        }
        Commands::Recommend { product_id, limit } => {
            let panel = shop.recommendations();
            let panel = match limit {
                Some(limit) => panel.with_limit(Some(limit)),
                None => panel,
            };
            // Failures are already logged; the panel just stays empty
            let cards = panel.load(&product_id).await.unwrap_or_default();
            utils::print_header(&format!("Recommended with {}", product_id));
            utils::print_cards(&cards);
            Ok(())
        }
        Commands::Trending { limit } => {
            let panel = shop.recommendations();
            let panel = match limit {
                Some(limit) => panel.with_limit(Some(limit)),
                None => panel,
            };
            let cards = panel.load_trending().await.unwrap_or_default();
            utils::print_header("Trending");
            utils::print_cards(&cards);
            Ok(())
        }
        Commands::Chat { message } => handle_chat(&shop, message).await,
        Commands::Search { query } => {
            match search_url(shop.client.base_url(), &query)? {
                Some(url) => println!("{}", url),
                None => utils::print_info("Empty query, nothing to search"),
            }
            Ok(())
        }
    }
}

fn handle_cart(cart: &mut CartStore, action: CartAction) -> Result<()> {
    match action {
        CartAction::Show => {
            utils::print_header("Cart");
            utils::print_line_items(cart.items(), cart.total());
        }
        CartAction::Add { id, name, price } => {
            cart.add_item(storefront::Product { id, name, price })?;
        }
        CartAction::Remove { id } => {
            cart.remove_item(&id)?;
            utils::print_success(&format!("Removed {}", id));
        }
        CartAction::Update { id, quantity } => {
            cart.update_quantity(&id, quantity)?;
            match cart.get(&id) {
                Some(item) => utils::print_success(&format!("{} × {}", item.name, item.quantity)),
                None => utils::print_info(&format!("{} is not in the cart", id)),
            }
        }
        CartAction::Total => println!("{}", cart.total()),
        CartAction::Clear => {
            cart.clear()?;
            utils::print_success("Cart cleared");
        }
    }

    Ok(())
}

async fn handle_chat(shop: &Storefront, message: Option<String>) -> Result<()> {
    let mut panel = shop.chat();
    panel.open();

    if let Some(message) = message {
        exchange(&mut panel, &message).await;
        return Ok(());
    }

    utils::print_header("Shop Assistant");
    utils::print_info("Type your messages (/exit or Ctrl+C to leave)\n");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    while panel.is_open() {
        utils::print_prompt("You: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        if input.trim() == "/exit" {
            panel.close();
            continue;
        }

        exchange(&mut panel, &input).await;
    }

    Ok(())
}

/// Submit one message, drawing the typing indicator while the server works
async fn exchange(panel: &mut ChatPanel, input: &str) {
    let Some(pending) = panel.begin(input) else {
        return;
    };
    if let Some(entry) = panel.transcript().last() {
        utils::print_chat_entry(entry);
    }

    let result = panel.send(&pending).await;
    if let ChatOutcome::Failed(e) = panel.finish(pending, result) {
        tracing::debug!("chat failed: {}", e);
    }
    if let Some(entry) = panel.transcript().last() {
        utils::print_chat_entry(entry);
    }
}
