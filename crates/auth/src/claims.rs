//! Client-side bearer token checks.
//!
//! The token is treated as `header.payload.signature`; only the payload is
//! decoded. Signature trust belongs to the issuing service. Anything that
//! cannot be read is classified as malformed, and malformed is handled
//! exactly like expired.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The payload claims this engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, in seconds since the Unix epoch.
    pub exp: f64,

    /// Issued-at, in seconds since the Unix epoch.
    pub iat: Option<f64>,

    /// Subject.
    pub sub: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.exp * 1000.0) as i64)
    }

    /// `now_ms > exp * 1000`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() as f64 > self.exp * 1000.0
    }

    /// Time left before expiry, or `None` once expired.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let left = self.expires_at()? - now;
        (left > Duration::zero()).then_some(left)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("payload segment is not valid base64")]
    PayloadEncoding,

    #[error("payload is not a JSON object")]
    PayloadNotObject,

    #[error("payload has no 'exp' claim")]
    MissingExpiry,

    #[error("'exp' claim is not a number")]
    NonNumericExpiry,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(#[from] MalformedReason),
}

/// Outcome of checking a token. Only `Valid` permits continued use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum TokenStatus {
    Valid,
    Expired,
    Malformed(MalformedReason),
}

impl TokenStatus {
    pub fn permits_use(&self) -> bool {
        matches!(self, TokenStatus::Valid)
    }
}

impl From<TokenValidationError> for TokenStatus {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => TokenStatus::Expired,
            TokenValidationError::Malformed(reason) => TokenStatus::Malformed(reason),
        }
    }
}

/// Decode the payload claims without checking expiry.
pub fn decode_claims(token: &str) -> Result<TokenClaims, MalformedReason> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(MalformedReason::SegmentCount(segments.len()));
    }

    let bytes = decode_segment(segments[1])?;
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|_| MalformedReason::PayloadNotObject)?;
    let payload = payload
        .as_object()
        .ok_or(MalformedReason::PayloadNotObject)?;

    let exp = payload
        .get("exp")
        .ok_or(MalformedReason::MissingExpiry)?
        .as_f64()
        .filter(|exp| exp.is_finite())
        .ok_or(MalformedReason::NonNumericExpiry)?;

    Ok(TokenClaims {
        exp,
        iat: payload.get("iat").and_then(Value::as_f64),
        sub: payload.get("sub").and_then(Value::as_str).map(str::to_string),
    })
}

// Issuers differ on alphabet and padding; accept either alphabet, padding optional.
fn decode_segment(segment: &str) -> Result<Vec<u8>, MalformedReason> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|_| MalformedReason::PayloadEncoding)
}

/// Structural and expiry check.
pub fn validate_token(token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenValidationError> {
    let claims = decode_claims(token)?;
    if claims.is_expired_at(now) {
        return Err(TokenValidationError::Expired);
    }
    Ok(claims)
}

pub fn token_status(token: &str, now: DateTime<Utc>) -> TokenStatus {
    match validate_token(token, now) {
        Ok(_) => TokenStatus::Valid,
        Err(err) => err.into(),
    }
}

/// True for expired *and* malformed tokens.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    !token_status(token, now).permits_use()
}
