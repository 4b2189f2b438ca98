use anyhow::{bail, Context, Result};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
pub const PAYMENT_SUCCEEDED_EVENT: &str = "payment_intent.succeeded";

const TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: serde_json::Value,
}

// Header format: "t=<unix seconds>,v1=<hex hmac>". The signed payload is the
// timestamp, a dot, and the raw request body. Malformed headers are errors;
// a well-formed header that does not match (or is outside the replay
// tolerance window) verifies to false.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> Result<bool> {
    let mut timestamp = None;
    let mut candidates = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .context("malformed timestamp in signature header")?,
                );
            }
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        bail!("signature header is missing a timestamp");
    };
    if candidates.is_empty() {
        bail!("signature header is missing a v1 signature");
    }

    if (chrono::Utc::now().timestamp() - timestamp).abs() > TOLERANCE_SECS {
        return Ok(false);
    }

    for candidate in candidates {
        let Ok(decoded) = hex::decode(candidate) else {
            continue;
        };
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .context("webhook secret is not a usable hmac key")?;
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        if mac.verify_slice(&decoded).is_ok() {
            return Ok(true);
        }
    }

    Ok(false)
}
