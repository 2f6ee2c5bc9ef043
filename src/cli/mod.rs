//! CLI module - Command-line interface for anicat
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// anicat - Anime catalog API
/// Serves the catalog, comments, likes and favorites over HTTP
#[derive(Parser)]
#[command(name = "anicat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Load a demo catalog into an empty database
    Seed,

    /// Create a user with the admin role
    CreateAdmin {
        /// Login name
        user_name: String,
        /// Email address
        email: String,
        /// Plaintext password, hashed before it is stored
        password: String,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["anicat"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::try_parse_from(["anicat", "create-admin", "root", "root@example.com", "hunter22"])
            .unwrap();
        match cli.command {
            Some(Commands::CreateAdmin {
                user_name, email, ..
            }) => {
                assert_eq!(user_name, "root");
                assert_eq!(email, "root@example.com");
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_create_admin_requires_password() {
        assert!(Cli::try_parse_from(["anicat", "create-admin", "root", "root@example.com"]).is_err());
    }
}
