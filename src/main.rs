use search_front::config::Config;
use search_front::search::Pipeline;
use search_front::search::handlers::router;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_ansi(!config.is_production())
        .init();

    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let bind_addr = config.bind_addr()?;

    tracing::info!("Starting search front end ({})", config.env);
    if config.test_data {
        tracing::info!("Test data mode: index services will not be queried");
    } else {
        tracing::info!("Text index: {}", config.elasticsearch_text);
        tracing::info!("Document store: {}", config.elasticsearch_docs);
    }

    // 1. Pipeline (bang table + index clients):
    let pipeline = Arc::new(Pipeline::initialize(config)?);
    tracing::info!("Loaded {} bangs", pipeline.bangs().len());

    // 2. Probe the index services in the background:
    if !pipeline.config().test_data {
        let probe = pipeline.clone();
        tokio::spawn(async move {
            probe.probe_services().await;
        });
    }

    // 3. HTTP Router:
    let app = router(pipeline);

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
