use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, warn};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the process environment may already be complete.
    let dotenv = dotenvy::dotenv();

    let filter = telemetry::env_filter_with_level("info,tender_store=info,contextor=info", Level::INFO);

    // ai_llm_service events go through the library's own layer
    let app_layer = fmt::layer()
        .with_target(false)
        .with_filter(filter::filter_fn(|meta| {
            !meta.target().starts_with(telemetry::TARGET_PREFIX)
        }));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .try_init()?;

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded, using process environment");
    }

    api::start().await?;

    Ok(())
}
