//! Generated tokens decode and verify with standard JWT tooling.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use apns_client::{ApnsClaims, ApnsService, FixedClock, ReqwestTransport};
use apns_settings::Credentials;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

const PUBLIC_KEY: &[u8] = include_bytes!("fixtures/AuthKey_ABC123.pub.pem");
const OTHER_PUBLIC_KEY: &[u8] = include_bytes!("fixtures/other_p256.pub.pem");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn service(key: &str, iat: i64) -> ApnsService {
    let credentials = Credentials::new("com.example.app", "ABC123", "TEAM01", fixture(key)).unwrap();
    ApnsService::with_parts(
        credentials,
        "https://api.sandbox.push.apple.com",
        Arc::new(ReqwestTransport::new(std::time::Duration::from_secs(1)).unwrap()),
        Arc::new(FixedClock(iat)),
    )
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::ES256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation
}

#[test]
fn decodes_with_matching_public_key() {
    let token = service("AuthKey_ABC123.p8", 1_700_000_000).fetch_jwt().unwrap();

    let header = jsonwebtoken::decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::ES256);
    assert_eq!(header.kid.as_deref(), Some("ABC123"));
    assert!(header.typ.is_none());

    let data = jsonwebtoken::decode::<ApnsClaims>(
        &token,
        &DecodingKey::from_ec_pem(PUBLIC_KEY).unwrap(),
        &validation(),
    )
    .unwrap();
    assert_eq!(data.claims.iss, "TEAM01");
    assert_eq!(data.claims.iat, 1_700_000_000);
}

#[test]
fn rejected_by_non_matching_public_key() {
    let token = service("AuthKey_ABC123.p8", 1_700_000_000).fetch_jwt().unwrap();
    let result = jsonwebtoken::decode::<ApnsClaims>(
        &token,
        &DecodingKey::from_ec_pem(OTHER_PUBLIC_KEY).unwrap(),
        &validation(),
    );
    assert!(result.is_err());
}

#[test]
fn token_from_other_key_rejected_by_first_public_key() {
    let token = service("other_p256.p8", 1_700_000_000).fetch_jwt().unwrap();

    let own = jsonwebtoken::decode::<ApnsClaims>(
        &token,
        &DecodingKey::from_ec_pem(OTHER_PUBLIC_KEY).unwrap(),
        &validation(),
    );
    assert!(own.is_ok());

    let foreign = jsonwebtoken::decode::<ApnsClaims>(
        &token,
        &DecodingKey::from_ec_pem(PUBLIC_KEY).unwrap(),
        &validation(),
    );
    assert!(foreign.is_err());
}

#[test]
fn wrong_curve_key_fails_to_sign() {
    let err = service("p384.p8", 1).fetch_jwt().unwrap_err();
    assert!(matches!(err, apns_client::ApnsError::Signing { .. }));
}
