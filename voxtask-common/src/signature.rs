//! Webhook signature verification
//!
//! GitHub signs webhook deliveries with HMAC-SHA256 over the raw request
//! body, keyed by the shared secret, and sends the result in the
//! `X-Hub-Signature-256` header as `sha256=<hex digest>`.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies here. The axum handler lives in the
//! server crate and only maps [`SignatureError`] to status codes.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Prefix of the header value
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Signature verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Request carried no signature header
    #[error("Missing signature header")]
    Missing,

    /// Server has no secret to verify against
    #[error("Webhook secret not configured")]
    SecretNotConfigured,

    /// Header value is not `sha256=<hex>`
    #[error("Malformed signature: {0}")]
    Malformed(String),

    /// Digest does not match the body
    #[error("Signature mismatch")]
    Mismatch,
}

/// Compute the header value for `body` signed with `secret`
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;
    mac.update(body);
    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes())))
}

/// Verify a webhook signature
///
/// Checks run strictly in order: header present, secret configured, header
/// well-formed, digest equal. The digest comparison is constant-time.
pub fn verify_signature(
    secret: Option<&str>,
    header: Option<&str>,
    body: &[u8],
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;

    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::SecretNotConfigured)?;

    let digest_hex = header
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| SignatureError::Malformed(format!("expected '{}' prefix", SIGNATURE_PREFIX)))?;

    let provided = hex::decode(digest_hex)
        .map_err(|e| SignatureError::Malformed(format!("invalid hex digest: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| SignatureError::Mismatch)
}
