use crate::cart::{CartView, LineItem, Notifier};
use crate::chat::{ChatEntry, Sender};
use crate::recommendations::ProductCard;
use colored::*;
use std::io::Write;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
    let _ = std::io::stdout().flush();
}

pub fn print_line_items(items: &[LineItem], total: f64) {
    if items.is_empty() {
        print_info("Cart is empty");
        return;
    }

    for item in items {
        println!(
            "  {:<10} {:<30} {:>4} × {:<10} {}",
            item.id.to_string().bright_black(),
            item.name,
            item.quantity,
            item.price,
            item.subtotal().to_string().bold()
        );
    }
    println!("  {} {}", "Total:".bold(), total.to_string().bright_green().bold());
}

pub fn print_cards(cards: &[ProductCard]) {
    for card in cards {
        println!(
            "  {} {}  {}",
            card.title.bold(),
            card.price_label.purple().bold(),
            card.href.bright_black()
        );
        println!("    {}", card.image_url.bright_black());
    }
}

pub fn print_chat_entry(entry: &ChatEntry) {
    match entry {
        ChatEntry::Message { sender: Sender::User, text } => println!("{} {}", "You:".yellow().bold(), text),
        ChatEntry::Message { sender: Sender::Assistant, text } => {
            println!("{} {}", "Assistant:".purple().bold(), text)
        }
        ChatEntry::Typing(_) => println!("{}", "...".bright_black()),
    }
}

/// Cart badge drawn on stderr so command output stays clean
pub struct TerminalBadge;

impl CartView for TerminalBadge {
    fn render(&self, item_count: u64) {
        eprintln!("{} {}", "🛒".bold(), item_count.to_string().bright_white().on_purple());
    }
}

/// Notices printed once; the terminal has no exit animation
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", format!(" {} ", message).white().on_green());
    }
}
