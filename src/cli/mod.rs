//! Command line entry points
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply PostgreSQL migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// FinTrack - personal finance tracking API
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply database migrations to the configured PostgreSQL database
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(Cli::parse_from(["fintrack", "serve"]).command, Command::Serve));
        assert!(matches!(Cli::parse_from(["fintrack", "migrate"]).command, Command::Migrate));
        assert!(Cli::try_parse_from(["fintrack", "ui"]).is_err());
    }
}
