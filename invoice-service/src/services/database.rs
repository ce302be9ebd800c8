//! SQLite persistence for invoices and seller settings.

use std::str::FromStr;

use chrono::Utc;
use service_core::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::models::{Invoice, InvoiceSummary, NewInvoice, SellerProfile};
use crate::services::metrics::DB_QUERY_DURATION;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (and create if missing) the SQLite database at `database_url`.
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Invalid database URL: {}", e))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to run migrations: {}", e))
            })?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let items = serde_json::to_string(&invoice.items).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to encode line items: {}", e))
        })?;

        let created = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                invoice_number, customer_name, customer_phone, customer_address,
                invoice_date, items, total_amount, discount_amount, tax_rate,
                currency, status, file_path, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '', ?)
            RETURNING *
            "#,
        )
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_phone)
        .bind(&invoice.customer_address)
        .bind(&invoice.invoice_date)
        .bind(items)
        .bind(invoice.total_amount.to_string())
        .bind(invoice.discount_amount.to_string())
        .bind(invoice.tax_rate.to_string())
        .bind(&invoice.currency)
        .bind(&invoice.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e))
        })?;

        timer.observe_duration();
        tracing::info!(invoice_id = created.id, "Invoice created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to fetch invoice: {}", e))
            })?;

        timer.observe_duration();
        Ok(invoice)
    }

    /// Newest-first listing for the overview screen.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT id, invoice_number, customer_name, invoice_date,
                   total_amount, currency, status, file_path
            FROM invoices
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e))
        })?;

        timer.observe_duration();
        Ok(invoices)
    }

    #[instrument(skip(self))]
    pub async fn update_file_path(&self, id: i64, file_path: &str) -> Result<u64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_file_path"])
            .start_timer();

        let result = sqlx::query("UPDATE invoices SET file_path = ? WHERE id = ?")
            .bind(file_path)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update file path: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected())
    }

    /// Returns true if a row was deleted.
    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e))
            })?;

        timer.observe_duration();
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(invoice_id = id, "Invoice deleted");
        }
        Ok(deleted)
    }

    /// Highest invoice row id, 0 when the table is empty.
    #[instrument(skip(self))]
    pub async fn max_invoice_id(&self) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["max_invoice_id"])
            .start_timer();

        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to read max invoice id: {}", e))
            })?;

        timer.observe_duration();
        Ok(max)
    }

    #[instrument(skip(self))]
    pub async fn load_seller_profile(&self) -> Result<SellerProfile, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["load_seller_profile"])
            .start_timer();

        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to load seller profile: {}", e))
            })?;

        timer.observe_duration();
        Ok(SellerProfile::from_map(&rows.into_iter().collect()))
    }

    #[instrument(skip(self, profile))]
    pub async fn save_seller_profile(&self, profile: &SellerProfile) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_seller_profile"])
            .start_timer();

        for (key, value) in profile.to_map() {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to save seller profile: {}", e))
            })?;
        }

        timer.observe_duration();
        tracing::info!("Seller profile saved");
        Ok(())
    }

    /// Insert default settings for any key not yet present.
    ///
    /// Existing values are never overwritten, so this is safe on every start.
    #[instrument(skip(self))]
    pub async fn seed_seller_profile(&self) -> Result<(), AppError> {
        let defaults = SellerProfile::defaults();
        for (key, value) in defaults.to_map() {
            sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to seed seller profile: {}",
                        e
                    ))
                })?;
        }
        Ok(())
    }
}
