use std::sync::Arc;

use tokio::net::TcpListener;

use docuscan::{
    config::{Config, StoreBackend},
    handlers::{create_router, AppState},
    store::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    telemetry::init_tracing("docuscan=debug,tower_http=debug,axum::rejection=trace");

    let config = Config::from_env()?;

    tracing::info!("Starting Docuscan document service");
    tracing::info!("Document store: {:?}", config.store_backend);
    tracing::info!("Allowed origin: {}", config.cors_origin);

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::MongoDb => {
            let uri = config
                .mongo_uri
                .as_deref()
                .ok_or("MONGO_URI must be set when DOCUMENT_STORE is mongodb")?;
            Arc::new(
                MongoDocumentStore::connect(uri, &config.mongo_database, &config.mongo_collection)
                    .await?,
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; documents are lost on restart");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    let app = create_router(
        AppState::new(store),
        &config.cors_origin,
        config.max_body_size_mb * 1024 * 1024,
    )?;

    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
