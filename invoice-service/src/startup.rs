use crate::config::InvoiceConfig;
use crate::handlers;
use crate::services::providers::{
    AbsentCatalog, CatalogProvider, EmailProvider, HttpCatalog, MockMailer, SmtpMailer,
};
use crate::services::{Database, DocumentStore, LocalDocumentStore, Renderer};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: InvoiceConfig,
    pub db: Database,
    pub documents: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn EmailProvider>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub renderer: Arc<Renderer>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        let db = Database::new(&config.database.url).await.map_err(|e| {
            tracing::error!("Failed to open database {}: {}", config.database.url, e);
            e
        })?;
        db.run_migrations().await?;
        db.seed_seller_profile().await?;

        let documents: Arc<dyn DocumentStore> =
            Arc::new(LocalDocumentStore::new(&config.documents.path));

        let mailer: Arc<dyn EmailProvider> = if config.smtp.enabled {
            match SmtpMailer::new(&config.smtp) {
                Ok(mailer) => {
                    tracing::info!(host = %config.smtp.host, "SMTP mailer enabled");
                    Arc::new(mailer)
                }
                Err(e) => {
                    tracing::warn!("SMTP configuration invalid, using mock mailer: {}", e);
                    Arc::new(MockMailer::new(true))
                }
            }
        } else {
            tracing::info!("SMTP disabled, using mock mailer");
            Arc::new(MockMailer::new(true))
        };

        let catalog: Arc<dyn CatalogProvider> =
            if config.catalog.enabled && !config.catalog.base_url.is_empty() {
                match HttpCatalog::new(
                    config.catalog.base_url.clone(),
                    Duration::from_secs(config.catalog.timeout_secs),
                ) {
                    Ok(catalog) => {
                        tracing::info!(base_url = %config.catalog.base_url, "Catalog bridge enabled");
                        Arc::new(catalog)
                    }
                    Err(e) => {
                        tracing::warn!("Catalog configuration invalid, bridge disabled: {}", e);
                        Arc::new(AbsentCatalog)
                    }
                }
            } else {
                tracing::info!("Catalog bridge disabled");
                Arc::new(AbsentCatalog)
            };

        let renderer = Arc::new(Renderer::new()?);

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            documents,
            mailer,
            catalog,
            renderer,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics))
            .route(
                "/invoices",
                post(handlers::create_invoice).get(handlers::list_invoices),
            )
            .route("/invoices/next-number", get(handlers::next_invoice_number))
            .route(
                "/invoices/:id",
                get(handlers::get_invoice).delete(handlers::delete_invoice),
            )
            .route("/invoices/:id/document", get(handlers::get_invoice_document))
            .route("/invoices/:id/email", post(handlers::email_invoice))
            .route("/catalog/products", get(handlers::search_catalog_products))
            .route(
                "/settings",
                get(handlers::get_settings).put(handlers::update_settings),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
