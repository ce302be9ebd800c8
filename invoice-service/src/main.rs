use invoice_service::config::InvoiceConfig;
use invoice_service::services::metrics::init_metrics;
use invoice_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing("invoice-service", "info");
    init_metrics();

    let config = InvoiceConfig::load().map_err(std::io::Error::other)?;
    let application = Application::build(config)
        .await
        .map_err(std::io::Error::other)?;

    application.run_until_stopped().await
}
