//! `tokreg` register flow - look up a token and mark it authenticated

use anyhow::{bail, Result};
use chrono::Utc;

use crate::d1::{escape_literal, D1Database};

/// Look up `token` in the authed_cookies table and mark it authenticated.
///
/// Progress goes to stdout; every failure comes back as an error so the
/// caller can map it to the process exit code. The row is never created
/// here - an unknown token is rejected.
pub async fn register(db: &str, token: &str) -> Result<()> {
    let database = D1Database::open(db)?;
    register_with(&database, token).await
}

/// Inner flow, parameterized over the database handle so tests can
/// substitute a shim-backed one.
pub async fn register_with(database: &D1Database, token: &str) -> Result<()> {
    let lookup = format!(
        "SELECT * FROM authed_cookies WHERE cookie = '{}'",
        escape_literal(token)
    );
    let sets = database.execute(&lookup)?;

    let Some(first) = sets.first() else {
        bail!("Unexpected output from wrangler: no result sets in lookup response");
    };

    let Some(row) = first.results.first() else {
        bail!("Token not found");
    };

    let Some(ip) = row.get("origin_ip").and_then(|v| v.as_str()) else {
        bail!("Unexpected output from wrangler: matching row has no origin_ip column");
    };

    println!("Authenticating ip {}", ip);

    if row.get("authed").and_then(|v| v.as_i64()).unwrap_or(0) != 0 {
        eprintln!("Note: token is already marked authed; refreshing authed_time");
    }

    let now = Utc::now();
    let unix_timestamp = now.timestamp_micros() as f64 / 1_000_000.0;
    let update = format!(
        "UPDATE authed_cookies SET authed = 1, authed_time = '{}' WHERE cookie = '{}'",
        unix_timestamp,
        escape_literal(token)
    );
    database.execute(&update)?;

    println!("Successfully registered token");
    Ok(())
}
