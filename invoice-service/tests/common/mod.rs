use invoice_service::config::{
    CatalogConfig, DatabaseConfig, DefaultsConfig, DocumentsConfig, InvoiceConfig, SmtpConfig,
};
use invoice_service::services::Database;
use invoice_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Database,
    pub documents_dir: PathBuf,
    // Held so the database file and documents survive until the test ends.
    _temp: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with an adjusted configuration (e.g. a catalog stub URL).
    pub async fn spawn_with(configure: impl FnOnce(&mut InvoiceConfig)) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp.path().join("invoices.db");
        let documents_dir = temp.path().join("documents");

        let mut config = InvoiceConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                environment: "test".to_string(),
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", db_path.display()),
            },
            documents: DocumentsConfig {
                path: documents_dir.display().to_string(),
            },
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 587,
                user: String::new(),
                password: String::new(),
                from_email: "billing@example.com".to_string(),
                from_name: "Invoice Service".to_string(),
                enabled: false, // Falls back to the mock mailer
            },
            catalog: CatalogConfig {
                base_url: String::new(),
                enabled: false,
                timeout_secs: 2,
            },
            defaults: DefaultsConfig {
                number_prefix: "CSS".to_string(),
                unit: "عدد".to_string(),
            },
        };
        configure(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            documents_dir,
            _temp: temp,
        }
    }
}

/// A create-invoice payload with one ordinary line item.
#[allow(dead_code)]
pub fn invoice_payload(invoice_number: &str, customer_name: &str) -> serde_json::Value {
    serde_json::json!({
        "invoice_number": invoice_number,
        "customer_name": customer_name,
        "customer_phone": "09120000000",
        "customer_address": "تهران، خیابان آزادی",
        "invoice_date": "1404/01/15",
        "tax_rate": "10",
        "currency": "ریال",
        "status": "unpaid",
        "items": [
            {
                "title": "طراحی سایت",
                "quantity": "2",
                "unit": "عدد",
                "price": "1000",
                "discount": "100"
            }
        ]
    })
}
