mod commands;

pub use commands::{CartAction, Cli, Commands};
