//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    config::ConfigCommands, import::ImportArgs, init::InitArgs, review::ReviewCommands,
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Folio portfolio back-office")]
#[command(long_about = "Back-office toolkit for a personal portfolio site: manage client reviews and bulk import them from CSV files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .folio/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

/// Admin login for commands that write to the store
#[derive(clap::Args, Clone, Debug, Default)]
pub struct AdminLogin {
    /// Admin user name
    #[arg(long, env = "FOLIO_USER")]
    pub user: Option<String>,

    /// Admin password
    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new Folio project
    Init(InitArgs),

    /// Bulk import reviews from a CSV file
    Import(ImportArgs),

    /// Client review management
    #[command(subcommand)]
    Review(ReviewCommands),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for terminals
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
