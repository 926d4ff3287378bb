use super::*;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

fn make_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

fn admin_claims() -> serde_json::Value {
    json!({
        "sub": "admin@sgm.com",
        "authorities": [{ "authority": "ROLE_ADMIN" }],
        "iat": 1_700_000_000,
        "exp": 1_700_086_400
    })
}

// =========================================================
// 解码测试
// =========================================================

#[test]
fn test_decodes_email_and_role() {
    let session = Session::from_token(&make_token(admin_claims())).unwrap();
    assert_eq!(session.email, "admin@sgm.com");
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.expires_at, Some(1_700_086_400));
    assert_eq!(session.issued_at, Some(1_700_000_000));
}

#[test]
fn test_first_authority_wins() {
    let token = make_token(json!({
        "sub": "hod@sgm.com",
        "authorities": [{ "authority": "ROLE_HOD" }, { "authority": "ROLE_TEACHER" }]
    }));
    let session = Session::from_token(&token).unwrap();
    assert_eq!(session.role, Role::Hod);
    assert_eq!(session.expires_at, None);
}

#[test]
fn test_padded_payload_is_accepted() {
    let token = make_token(admin_claims());
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[1].push_str("==");
    let padded = parts.join(".");
    assert!(Session::from_token(&padded).is_ok());
}

#[test]
fn test_rejects_malformed_tokens() {
    assert_eq!(Session::from_token(""), Err(SessionError::Malformed));
    assert_eq!(Session::from_token("abc"), Err(SessionError::Malformed));
    assert_eq!(Session::from_token("a..c"), Err(SessionError::Malformed));
    assert_eq!(Session::from_token("a.b.c.d"), Err(SessionError::Malformed));
}

#[test]
fn test_rejects_bad_payloads() {
    assert!(matches!(
        Session::from_token("h.!!!.s"),
        Err(SessionError::Encoding(_))
    ));

    let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
    assert!(matches!(
        Session::from_token(&not_json),
        Err(SessionError::Claims(_))
    ));
}

#[test]
fn test_missing_or_unknown_authority() {
    let token = make_token(json!({ "sub": "x@sgm.com", "authorities": [] }));
    assert_eq!(Session::from_token(&token), Err(SessionError::MissingAuthority));

    let token = make_token(json!({ "sub": "x@sgm.com" }));
    assert_eq!(Session::from_token(&token), Err(SessionError::MissingAuthority));

    let token = make_token(json!({
        "sub": "x@sgm.com",
        "authorities": [{ "authority": "ROLE_JANITOR" }]
    }));
    assert_eq!(
        Session::from_token(&token),
        Err(SessionError::UnknownRole("ROLE_JANITOR".to_string()))
    );
}

// =========================================================
// 有效期测试
// =========================================================

#[test]
fn test_expiry_boundary() {
    let session = Session::from_token(&make_token(admin_claims())).unwrap();
    assert!(!session.is_expired(1_700_086_399));
    assert!(session.is_expired(1_700_086_400));
    assert!(session.is_expired(1_800_000_000));
}

#[test]
fn test_restore_rejects_expired_token() {
    let token = make_token(admin_claims());
    assert!(Session::restore(&token, 1_700_000_001).is_ok());
    assert_eq!(
        Session::restore(&token, 1_700_086_401),
        Err(SessionError::Expired)
    );
}

#[test]
fn test_role_authority_roundtrip() {
    for role in Role::ALL {
        assert_eq!(Role::from_authority(role.authority()), Some(role));
    }
    assert_eq!(Role::Hod.to_string(), "ROLE_HOD");
    assert_eq!(Role::Hod.label(), "HOD");
}
