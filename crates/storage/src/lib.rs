use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use shared::domain::PaymentId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Payment fields after numeric conversion, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub card_number: i64,
    pub expiration_date: String,
    pub cvv: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredPayment {
    pub payment_id: PaymentId,
    pub card_number: i64,
    pub expiration_date: String,
    pub cvv: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every in-memory connection is its own empty database, so the pool
        // holds exactly one and never recycles it.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Persists one payment under a freshly generated id. Nothing dedupes
    /// identical payments, so a repeated submit yields a second record.
    pub async fn insert_payment(&self, payment: &NewPayment) -> Result<PaymentId> {
        let payment_id = PaymentId::generate();
        sqlx::query(
            "INSERT INTO payments (payment_id, card_number, expiration_date, cvv, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(payment_id.as_str())
        .bind(payment.card_number)
        .bind(&payment.expiration_date)
        .bind(payment.cvv)
        .bind(payment.amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("failed to insert payment")?;
        Ok(payment_id)
    }

    pub async fn load_payment(&self, payment_id: &PaymentId) -> Result<Option<StoredPayment>> {
        let row = sqlx::query(
            "SELECT payment_id, card_number, expiration_date, cvv, amount, created_at
             FROM payments WHERE payment_id = ?",
        )
        .bind(payment_id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(stored_payment_from_row).transpose()
    }

    /// Newest first.
    pub async fn list_payments(&self, limit: u32) -> Result<Vec<StoredPayment>> {
        let rows = sqlx::query(
            "SELECT payment_id, card_number, expiration_date, cvv, amount, created_at
             FROM payments ORDER BY seq DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(stored_payment_from_row).collect()
    }

    pub async fn count_payments(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn stored_payment_from_row(row: &SqliteRow) -> Result<StoredPayment> {
    Ok(StoredPayment {
        payment_id: PaymentId(row.try_get("payment_id")?),
        card_number: row.try_get("card_number")?,
        expiration_date: row.try_get("expiration_date")?,
        cvv: row.try_get("cvv")?,
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
