//! Unit tests for access token signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use dm_shared::config::JwtConfig;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::{Role, User};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{
    TokenServiceConfig, TokenSigner, MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS,
};

fn signer() -> TokenSigner {
    TokenSigner::new(&TokenServiceConfig::default()).unwrap()
}

fn user() -> User {
    User::new("signer@example.com", "Signer", &[Role::Editor])
}

fn expired_claims(user: &User) -> Claims {
    let config = TokenServiceConfig::default();
    Claims::for_user(
        user,
        Uuid::new_v4(),
        Utc::now() - Duration::hours(3),
        Duration::minutes(60),
        &config.issuer,
        &config.audience,
    )
}

#[test]
fn test_rejects_short_secret() {
    let config = TokenServiceConfig {
        jwt_secret: "too-short".to_string(),
        ..Default::default()
    };

    let result = TokenSigner::new(&config);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::KeyConfiguration { .. }))
    ));
}

#[test]
fn test_rejects_non_hmac_algorithm() {
    let config = TokenServiceConfig {
        algorithm: Algorithm::RS256,
        ..Default::default()
    };

    let result = TokenSigner::new(&config);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::KeyConfiguration { .. }))
    ));
}

#[test]
fn test_rejects_non_positive_lifetimes() {
    let lifetimes = [(0, 7), (-5, 7), (60, 0), (60, -1)];

    for (minutes, days) in lifetimes {
        let config = TokenServiceConfig {
            access_token_expiry_minutes: minutes,
            refresh_token_expiry_days: days,
            ..Default::default()
        };

        let result = TokenSigner::new(&config);
        assert!(
            matches!(result, Err(DomainError::Token(TokenError::KeyConfiguration { .. }))),
            "accepted {} minutes / {} days",
            minutes,
            days
        );
    }
}

#[test]
fn test_rejects_oversized_lifetimes() {
    let config = TokenServiceConfig {
        refresh_token_expiry_days: 100_000_000,
        ..Default::default()
    };
    assert!(matches!(
        TokenSigner::new(&config),
        Err(DomainError::Token(TokenError::KeyConfiguration { .. }))
    ));

    let config = TokenServiceConfig {
        access_token_expiry_minutes: MAX_ACCESS_TOKEN_EXPIRY_MINUTES + 1,
        ..Default::default()
    };
    assert!(matches!(
        TokenSigner::new(&config),
        Err(DomainError::Token(TokenError::KeyConfiguration { .. }))
    ));

    let at_limit = TokenServiceConfig {
        access_token_expiry_minutes: MAX_ACCESS_TOKEN_EXPIRY_MINUTES,
        refresh_token_expiry_days: MAX_REFRESH_TOKEN_EXPIRY_DAYS,
        ..Default::default()
    };
    assert!(TokenSigner::new(&at_limit).is_ok());
}

#[test]
fn test_from_jwt_config_rejects_bad_lifetimes() {
    let config = JwtConfig::default().with_refresh_expiry_days(100_000_000);
    assert!(matches!(
        TokenServiceConfig::from_jwt_config(&config),
        Err(DomainError::Token(TokenError::KeyConfiguration { .. }))
    ));

    let config = JwtConfig::default().with_access_expiry_minutes(0);
    assert!(TokenServiceConfig::from_jwt_config(&config).is_err());

    assert!(TokenServiceConfig::from_jwt_config(&JwtConfig::default()).is_ok());
}

#[test]
fn test_issue_and_verify() {
    let signer = signer();
    let user = user();

    let access = signer.issue(&user).unwrap();
    assert_eq!(access.token.split('.').count(), 3);

    let claims = signer.verify(&access.token).unwrap();
    assert_eq!(claims, access.claims);
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.exp - claims.iat, 60 * 60);
    assert!(claims.roles.contains("Editor"));
}

#[test]
fn test_each_token_gets_a_fresh_jti() {
    let signer = signer();
    let user = user();

    let first = signer.issue(&user).unwrap();
    let second = signer.issue(&user).unwrap();

    assert_ne!(first.jwt_id(), second.jwt_id());
    assert!(Uuid::parse_str(first.jwt_id()).is_ok());
}

#[test]
fn test_verify_reports_expiry() {
    let signer = signer();
    let token = signer.encode(&expired_claims(&user())).unwrap();

    let result = signer.verify(&token);
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenExpired))));
}

#[test]
fn test_validate_expired_accepts_expired_token() {
    let signer = signer();
    let user = user();
    let claims = expired_claims(&user);
    let token = signer.encode(&claims).unwrap();

    let decoded = signer.validate_expired(&token).unwrap();
    assert_eq!(decoded, claims);
}

#[test]
fn test_validate_expired_rejects_tampered_signature() {
    let signer = signer();
    let token = signer.issue(&user()).unwrap().token;
    let (head, signature) = token.rsplit_once('.').unwrap();
    let first = signature.chars().next().unwrap();
    let replacement = if first == 'A' { 'B' } else { 'A' };
    let token = format!("{}.{}{}", head, replacement, &signature[1..]);

    let result = signer.validate_expired(&token);
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidToken))));
}

#[test]
fn test_validate_expired_rejects_other_secret() {
    let other = TokenSigner::new(&TokenServiceConfig {
        jwt_secret: "another-secret-of-sufficient-length-0123".to_string(),
        ..Default::default()
    })
    .unwrap();
    let token = other.issue(&user()).unwrap().token;

    assert!(signer().validate_expired(&token).is_err());
}

#[test]
fn test_validate_expired_rejects_wrong_issuer_and_audience() {
    let signer = signer();
    let user = user();
    let config = TokenServiceConfig::default();

    let mut wrong_issuer = expired_claims(&user);
    wrong_issuer.iss = "someone-else".to_string();
    let token = signer.encode(&wrong_issuer).unwrap();
    assert!(signer.validate_expired(&token).is_err());

    let wrong_audience = Claims::for_user(
        &user,
        Uuid::new_v4(),
        Utc::now(),
        Duration::minutes(5),
        &config.issuer,
        "mobile-app",
    );
    let token = signer.encode(&wrong_audience).unwrap();
    assert!(signer.validate_expired(&token).is_err());
}

#[test]
fn test_validate_expired_rejects_algorithm_mismatch() {
    let config = TokenServiceConfig::default();
    let claims = expired_claims(&user());
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let result = signer().validate_expired(&token);
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidToken))));
}

#[test]
fn test_validate_expired_rejects_garbage() {
    let result = signer().validate_expired("not-a-token");
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidToken))));
}
