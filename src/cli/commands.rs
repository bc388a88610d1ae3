//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Storefront query client CLI
#[derive(Parser, Debug)]
#[command(name = "storefront-query")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List products page by page
    Products(ListArgs),

    /// List posts page by page
    Posts {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Show one product
    Product {
        /// Product id
        id: i64,
    },

    /// Show one post
    Post {
        /// Post id
        id: i64,
    },

    /// Show the available categories and product types
    Filters,

    /// Create a checkout session from a JSON cart file
    Checkout {
        /// JSON array of cart lines
        file: PathBuf,
    },
}

/// Options of paginated product listing
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only products in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only products of this type
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pub pages: usize,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
