// src/utils/token.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

/// Which kind of principal a token belongs to. Admins and customers share the
/// same token format but live in disjoint identity spaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Admin,
    Customer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub kind: PrincipalKind,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &str,
    kind: PrincipalKind,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        kind,
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<TokenClaims, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims),
        Err(_) => Err(HttpError::unauthorized(
            ErrorMessage::InvalidToken.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn create_and_decode_roundtrip() {
        let id = Uuid::new_v4().to_string();
        let token = create_token(&id, PrincipalKind::Admin, SECRET, 60).unwrap();
        let claims = decode_token(token, SECRET).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.kind, PrincipalKind::Admin);
    }

    #[test]
    fn kind_is_preserved_for_customers() {
        let token = create_token("someone", PrincipalKind::Customer, SECRET, 60).unwrap();
        let claims = decode_token(token, SECRET).unwrap();
        assert_eq!(claims.kind, PrincipalKind::Customer);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("someone", PrincipalKind::Admin, SECRET, 60).unwrap();
        assert!(decode_token(token, b"other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = create_token("someone", PrincipalKind::Admin, SECRET, -10).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }

    #[test]
    fn empty_subject_is_rejected() {
        assert!(create_token("", PrincipalKind::Admin, SECRET, 60).is_err());
    }
}
