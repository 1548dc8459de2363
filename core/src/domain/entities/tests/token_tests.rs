//! Unit tests for token entities

use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;

use crate::domain::entities::client::ClientRecord;
use crate::domain::entities::token::{
    AccessToken, Claims, RefreshToken, REFRESH_TOKEN_SECRET_LEN, REFRESH_TOKEN_SEPARATOR,
};
use crate::errors::TokenError;

#[test]
fn test_generated_token_shape() {
    let token = RefreshToken::generate(42).unwrap().to_string();

    let (counter, secret) = token.split_once(REFRESH_TOKEN_SEPARATOR).unwrap();
    assert_eq!(counter, "42");
    assert_eq!(secret.len(), REFRESH_TOKEN_SECRET_LEN);
    assert_eq!(secret.len(), 80);
    assert!(secret.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_generated_tokens_differ_for_same_counter() {
    let a = RefreshToken::generate(1).unwrap();
    let b = RefreshToken::generate(1).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_ten_thousand_tokens_do_not_collide() {
    let mut record = ClientRecord::new("alice");
    for _ in 0..10_000 {
        record.issue_token().unwrap();
    }

    // Compare the random parts only; the counters differ trivially
    let secrets: HashSet<&str> = record
        .active_tokens
        .iter()
        .filter_map(|t| t.split_once(REFRESH_TOKEN_SEPARATOR).map(|(_, secret)| secret))
        .collect();
    assert_eq!(secrets.len(), 10_000);
}

#[test]
fn test_parse_rejects_malformed_tokens() {
    let secret = "a".repeat(REFRESH_TOKEN_SECRET_LEN);
    let cases = vec![
        String::new(),
        String::from("no-separator"),
        format!(".{}", secret),
        format!("+1.{}", secret),
        format!("x1.{}", secret),
        format!("1.{}", &secret[1..]),
        format!("1.{}", "A".repeat(REFRESH_TOKEN_SECRET_LEN)),
        format!("1.{}", "g".repeat(REFRESH_TOKEN_SECRET_LEN)),
        format!("99999999999999999999999.{}", secret),
    ];

    for case in cases {
        assert_eq!(
            case.parse::<RefreshToken>(),
            Err(TokenError::InvalidTokenFormat),
            "expected {:?} to be rejected",
            case
        );
    }
}

#[test]
fn test_parse_accepts_well_formed_token() {
    let raw = format!("7.{}", "0123456789abcdef".repeat(5));
    let token: RefreshToken = raw.parse().unwrap();
    assert_eq!(token.counter(), 7);
    assert_eq!(token.to_string(), raw);
}

#[test]
fn test_debug_and_log_label_never_show_full_secret() {
    let token = RefreshToken::generate(3).unwrap();
    let full = token.to_string();
    let secret = full.split_once('.').unwrap().1;

    let debug = format!("{:?}", token);
    assert!(!debug.contains(secret));
    assert!(debug.contains("3."));

    assert_eq!(RefreshToken::log_label(&full), token.redacted());
    assert_eq!(RefreshToken::log_label("garbage"), "<malformed>");
}

#[test]
fn test_claims_for_access_token() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let claims = Claims::issued_at("alice", "issuer", "audience", Duration::minutes(15), now);

    assert_eq!(claims.user_id(), "alice");
    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.nbf, now.timestamp());
    assert_eq!(claims.exp, now.timestamp() + 900);
    assert_eq!(claims.iss, "issuer");
    assert_eq!(claims.aud, "audience");
    assert!(claims.is_expired());
}

#[test]
fn test_claims_have_unique_ids() {
    let a = Claims::new_access_token("alice", "i", "a", Duration::minutes(5));
    let b = Claims::new_access_token("alice", "i", "a", Duration::minutes(5));
    assert_ne!(a.jti, b.jti);
    assert!(!a.is_expired());
}

#[test]
fn test_bearer_access_token() {
    let token = AccessToken::bearer("jwt".to_string(), 900);
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 900);
}
