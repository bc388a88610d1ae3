//! CLI runner - executes commands

use crate::checkout::CheckoutItem;
use crate::cli::commands::{Cli, Commands, ListArgs, OutputFormat};
use crate::config::StorefrontConfig;
use crate::error::{Error, Result};
use crate::pagination::InfiniteData;
use crate::query::{InfiniteQueryDescriptor, ProductFilters};
use crate::storefront::Storefront;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let store = Storefront::from_config(&self.load_config()?)?;

        match &self.cli.command {
            Commands::Products(args) => self.products(&store, args).await,
            Commands::Posts { pages } => {
                let descriptor = store.post_infinite_query();
                self.paginate(&store, &descriptor, *pages).await
            }
            Commands::Product { id } => {
                let data = store.client().fetch_query(&store.one_product_query(*id)).await?;
                self.output(&data);
                Ok(())
            }
            Commands::Post { id } => {
                let data = store.client().fetch_query(&store.one_post_query(*id)).await?;
                self.output(&data);
                Ok(())
            }
            Commands::Filters => {
                let data = store.client().fetch_query(&store.category_type_query()).await?;
                self.output(&data);
                Ok(())
            }
            Commands::Checkout { file } => self.checkout(&store, file).await,
        }
    }

    /// Load configuration; flags take precedence over the file
    fn load_config(&self) -> Result<StorefrontConfig> {
        let mut config = match &self.cli.config {
            Some(path) => StorefrontConfig::from_file(path)?,
            None => StorefrontConfig::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        Ok(config)
    }

    async fn products(&self, store: &Storefront, args: &ListArgs) -> Result<()> {
        let filters = ProductFilters::from_options(args.category.as_deref(), args.kind.as_deref());
        let descriptor = store.product_infinite_query(&filters);
        self.paginate(store, &descriptor, args.pages).await
    }

    /// Load up to `pages` pages and print every item with the final cursor
    async fn paginate(
        &self,
        store: &Storefront,
        descriptor: &InfiniteQueryDescriptor,
        pages: usize,
    ) -> Result<()> {
        let client = store.client();
        let mut data = client.fetch_infinite_query(descriptor).await?;
        while data.page_count() < pages && data.has_next_page() {
            data = client.fetch_next_page(descriptor).await?;
        }
        debug!(key = %descriptor.key(), pages = data.page_count(), "pagination finished");

        self.output(&summarize(&data));
        Ok(())
    }

    async fn checkout(&self, store: &Storefront, file: &Path) -> Result<()> {
        let items = load_cart(file)?;
        let session = store.create_checkout_session(&items).await?;
        self.output(&session);
        Ok(())
    }

    /// Output a message
    fn output(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn summarize(data: &Arc<InfiniteData>) -> Value {
    json!({
        "pages": data.page_count(),
        "items": data.items().cloned().collect::<Vec<_>>(),
        "nextCursor": data.pages.last().and_then(|page| page.next_cursor.clone()),
    })
}

fn load_cart(path: &Path) -> Result<Vec<CheckoutItem>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read cart file: {e}")))?;
    serde_json::from_str(&content).map_err(|e| Error::config(format!("Invalid cart JSON: {e}")))
}
