//! Postgres idempotency store for processed trade events.
//!
//! Insert/select only: rows are created exactly once per trade id and never
//! updated or deleted here. The unique constraint declared in the migration
//! is the true exactly-once boundary; [`insert_processed_trade`] surfaces a
//! violation as `Ok(false)` ("already processed"), not as an error.

use anyhow::{Context, Result};
use sbr_schemas::{NewProcessedTrade, TradeId};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const ENV_DB_URL: &str = "SBR_DATABASE_URL";

/// Connect to Postgres using SBR_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url =
        std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_processed_trades_table: bool,
}

/// Connectivity + schema presence probe, logged at daemon boot.
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (exists,): (bool,) = sqlx::query_as(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema = 'public' and table_name = 'processed_trades'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_processed_trades_table: exists,
    })
}

/// Whether a row already exists for this trade id.
pub async fn trade_exists(pool: &PgPool, id: &TradeId) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        select exists (
            select 1
            from processed_trades
            where account_address = $1
              and trade_kind = $2
              and sequence_number = $3
        )
        "#,
    )
    .bind(&id.account_address)
    .bind(id.kind.as_str())
    .bind(&id.sequence_number)
    .fetch_one(pool)
    .await
    .context("trade_exists query failed")?;

    Ok(exists)
}

/// Insert one processed-trade row.
///
/// Returns `Ok(true)` when the row was created, `Ok(false)` when the trade
/// id was already recorded (unique violation, e.g. an overlapping cycle got
/// there first). Any other failure is an error.
pub async fn insert_processed_trade(pool: &PgPool, row: &NewProcessedTrade) -> Result<bool> {
    let res = sqlx::query(
        r#"
        insert into processed_trades (
            id, account_address, trade_kind, sequence_number,
            ticker_raw, ticker, usdc_amount, asset_amount, price,
            ledger_version, occurred_at, processed_at
        ) values (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
        )
        "#,
    )
    .bind(row.id)
    .bind(&row.account_address)
    .bind(row.trade_kind.as_str())
    .bind(&row.sequence_number)
    .bind(&row.ticker_raw)
    .bind(&row.ticker)
    .bind(&row.usdc_amount)
    .bind(&row.asset_amount)
    .bind(&row.price)
    .bind(&row.ledger_version)
    .bind(row.occurred_at)
    .bind(row.processed_at)
    .execute(pool)
    .await;

    match res {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e, "uq_processed_trades_trade_id") => Ok(false),
        Err(e) => Err(anyhow::Error::new(e).context("insert_processed_trade failed")),
    }
}

/// Fetch the stored unscaled amount strings for one trade id, if present.
pub async fn fetch_amounts(
    pool: &PgPool,
    id: &TradeId,
) -> Result<Option<(String, String, String)>> {
    let row: Option<(String, String, String)> = sqlx::query_as(
        r#"
        select usdc_amount, asset_amount, price
        from processed_trades
        where account_address = $1
          and trade_kind = $2
          and sequence_number = $3
        "#,
    )
    .bind(&id.account_address)
    .bind(id.kind.as_str())
    .bind(&id.sequence_number)
    .fetch_optional(pool)
    .await
    .context("fetch_amounts query failed")?;

    Ok(row)
}

/// Total processed rows; surfaced in boot logs and operator checks.
pub async fn count_processed(pool: &PgPool) -> Result<i64> {
    let (n,): (i64,) = sqlx::query_as("select count(*)::bigint from processed_trades")
        .fetch_one(pool)
        .await
        .context("count_processed failed")?;
    Ok(n)
}

/// Detect a Postgres unique constraint violation by name.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.constraint() == Some(constraint)
                || (db_err.code().as_deref() == Some("23505")
                    && db_err.constraint() == Some(constraint))
        }
        _ => false,
    }
}
