//! Tests for JWT token handling.

use super::*;

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: 15,
        refresh_token_expires_days: 7,
    })
}

#[test]
fn generate_access_token_produces_token() {
    let service = create_test_service();
    let token = service
        .generate_access_token(Uuid::new_v4(), "qa_qc_officer")
        .unwrap();
    assert!(!token.is_empty());
}

#[test]
fn validate_token_round_trips_claims() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service.generate_access_token(user_id, "admin").unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "admin");
    assert!(claims.exp > claims.iat);
}

#[test]
fn validate_rejects_garbage_token() {
    let service = create_test_service();
    assert!(service.validate_token("invalid.token.here").is_err());
}

#[test]
fn validate_rejects_token_from_other_secret() {
    let other = JwtService::new(JwtConfig {
        secret: "a-completely-different-secret".to_string(),
        ..JwtConfig::default()
    });
    let token = other
        .generate_access_token(Uuid::new_v4(), "engineer")
        .unwrap();

    let service = create_test_service();
    assert!(service.validate_token(&token).is_err());
}

#[test]
fn access_token_expiry_is_reported_in_seconds() {
    let service = create_test_service();
    assert_eq!(service.access_token_expires_in(), 15 * 60);
    assert_eq!(service.refresh_token_expires_days(), 7);
}
