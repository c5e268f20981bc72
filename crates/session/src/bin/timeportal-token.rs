//! Inspect a bearer token the way the session engine sees it.
//!
//! Usage: `timeportal-token <token>` (or the token on stdin).

use std::io::Read;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;

use timeportal_auth::{decode_claims, token_status};

fn main() -> anyhow::Result<()> {
    timeportal_observability::init();

    let token = match std::env::args().nth(1) {
        Some(token) => token,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read token from stdin")?;
            buf
        }
    };
    let token = token.trim();

    let now = Utc::now();
    let status = token_status(token, now);
    let claims = decode_claims(token).ok();

    let report = json!({
        "checked_at": now,
        "status": status,
        "subject": claims.as_ref().and_then(|c| c.sub.clone()),
        "expires_at": claims.as_ref().and_then(|c| c.expires_at()),
        "seconds_remaining": claims
            .as_ref()
            .and_then(|c| c.time_remaining(now))
            .map(|left| left.num_seconds()),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render report")?
    );

    if !status.permits_use() {
        std::process::exit(1);
    }
    Ok(())
}
