//! Sqlite operations on the payment-nonce table.
//!
//! A nonce records that the callback for a given provider transaction id has already been
//! processed. SQLite has no TTL indexes, so expired rows are purged inline by the callers that
//! touch the table; there is no background sweeper.

use sqlx::SqliteConnection;

/// Nonces expire ten minutes after they are recorded.
pub const NONCE_TTL_SECONDS: i64 = 600;

pub async fn purge_expired(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "DELETE FROM payment_nonces WHERE (unixepoch(CURRENT_TIMESTAMP) - unixepoch(created_at)) > $1",
    )
    .bind(NONCE_TTL_SECONDS)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

/// Record the nonce if it has not been seen. Returns `false` when it already exists, i.e. the
/// delivery is a replay.
pub async fn try_insert(nonce: &str, purpose: &str, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("INSERT INTO payment_nonces (nonce, purpose) VALUES ($1, $2) ON CONFLICT (nonce) DO NOTHING")
        .bind(nonce)
        .bind(purpose)
        .execute(conn)
        .await?;
    Ok(res.rows_affected() == 1)
}
