use hmac::{Hmac, Mac};
use order_reconciler::webhook::verify_signature;
use sha2::Sha256;

const SECRET: &str = "whsec_test123secret456";

fn current_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

fn old_timestamp() -> String {
    (chrono::Utc::now().timestamp() - 600).to_string()
}

fn compute_signature(payload: &[u8], secret: &str, timestamp: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn signature_header(payload: &[u8], secret: &str, timestamp: &str) -> String {
    format!("t={},v1={}", timestamp, compute_signature(payload, secret, timestamp))
}

#[test]
fn valid_signature_is_accepted() {
    let payload = b"{\"type\":\"payment_intent.succeeded\"}";
    let header = signature_header(payload, SECRET, &current_timestamp());

    let result = verify_signature(payload, &header, SECRET).expect("verification should not error");

    assert!(result, "valid signature should be accepted");
}

#[test]
fn signature_from_wrong_secret_is_rejected() {
    let payload = b"{\"type\":\"payment_intent.succeeded\"}";
    let header = signature_header(payload, "wrong_secret", &current_timestamp());

    let result = verify_signature(payload, &header, SECRET).expect("verification should not error");

    assert!(!result, "signature from a different secret should be rejected");
}

#[test]
fn modified_payload_is_rejected() {
    let original = b"{\"type\":\"payment_intent.succeeded\"}";
    let modified = b"{\"type\":\"payment_intent.succeeded\",\"tampered\":true}";
    let header = signature_header(original, SECRET, &current_timestamp());

    let result = verify_signature(modified, &header, SECRET).expect("verification should not error");

    assert!(!result, "modified payload should be rejected");
}

#[test]
fn old_timestamp_is_rejected() {
    let payload = b"{\"type\":\"payment_intent.succeeded\"}";
    let header = signature_header(payload, SECRET, &old_timestamp());

    let result = verify_signature(payload, &header, SECRET).expect("verification should not error");

    assert!(!result, "timestamp outside the tolerance window should be rejected");
}

#[test]
fn missing_timestamp_errors() {
    let payload = b"{}";

    let result = verify_signature(payload, "v1=deadbeef", SECRET);

    assert!(result.is_err(), "header without timestamp should error");
}

#[test]
fn missing_signature_errors() {
    let payload = b"{}";

    let result = verify_signature(payload, "t=1234567890", SECRET);

    assert!(result.is_err(), "header without v1 signature should error");
}

#[test]
fn malformed_header_errors() {
    let payload = b"{}";

    assert!(verify_signature(payload, "garbage", SECRET).is_err());
    assert!(verify_signature(payload, "", SECRET).is_err());
}

#[test]
fn non_hex_signature_is_rejected_without_error() {
    let payload = b"{}";
    let header = format!("t={},v1=not-hex", current_timestamp());

    let result = verify_signature(payload, &header, SECRET).expect("verification should not error");

    assert!(!result);
}

#[test]
fn binary_payload_with_valid_signature_is_accepted() {
    let payload = &[0x00, 0x01, 0x02, 0xFF, 0xFE, 0xFD];
    let header = signature_header(payload, SECRET, &current_timestamp());

    let result = verify_signature(payload, &header, SECRET).expect("verification should not error");

    assert!(result);
}
