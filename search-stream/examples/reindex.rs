//! End-to-end reindex demo.
//!
//! Streams every document out of a source index and bulk-writes it into a
//! destination index.
//!
//! ```sh
//! OPENSEARCH_URL=http://localhost:9200 \
//! REINDEX_SOURCE=articles REINDEX_DEST=articles-v2 \
//! cargo run --example reindex
//! ```

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use futures::StreamExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use search_stream::{OpenSearchEngine, ScrollQuery, SearchStreamClient, StreamConfig, WriteIntent};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_stream=info,reindex=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();

    let url = env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
    let source = env::var("REINDEX_SOURCE").unwrap_or_else(|_| "articles".to_string());
    let dest = env::var("REINDEX_DEST").unwrap_or_else(|_| format!("{}-copy", source));

    info!(url = %url, source = %source, dest = %dest, "Starting reindex");

    let engine = Arc::new(OpenSearchEngine::new(&url)?);
    let config = StreamConfig::from_env();
    let client = SearchStreamClient::with_config(engine, config.scroll, config.bulk)?;

    // Every hit from the source becomes an index intent for the destination.
    let dest_index = dest.clone();
    let intents = client
        .stream_search(ScrollQuery::match_all().with_index(source))
        .filter_map(move |hit| {
            let dest_index = dest_index.clone();
            async move {
                match hit {
                    Ok(hit) => Some(
                        WriteIntent::index(hit.source)
                            .with_id(hit.id)
                            .with_index(dest_index),
                    ),
                    Err(e) => {
                        error!(error = %e, "Scroll failed, ending intent stream");
                        None
                    }
                }
            }
        });

    let mut batches = 0usize;
    let mut item_failures = 0usize;
    let mut responses = Box::pin(client.bulk_stream(intents));
    while let Some(response) = responses.next().await {
        match response {
            Ok(response) => {
                batches += 1;
                if response.errors {
                    item_failures += response.failed_items().count();
                }
            }
            Err(e) => {
                error!(error = %e, "Bulk batch failed");
                break;
            }
        }
    }

    info!(
        batches = batches,
        item_failures = item_failures,
        destination = %dest,
        "Reindex finished"
    );
    Ok(())
}
