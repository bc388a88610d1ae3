//! CLI module
//!
//! Command-line interface for querying a storefront backend.
//!
//! # Commands
//!
//! - `products` - Paginated product list, optionally narrowed by facets
//! - `posts` - Paginated post list
//! - `product` / `post` - One entity by id
//! - `filters` - Available categories and product types
//! - `checkout` - Create a checkout session from a cart file

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListArgs, OutputFormat};
pub use runner::Runner;
