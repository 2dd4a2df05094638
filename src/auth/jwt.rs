use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, crypto, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Claims;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 tokens with the process-wide secret.
///
/// Tokens are stateless: nothing is stored, so a token stays valid until its
/// `exp` even if the owner's password changes afterwards.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against our own clock in verify_at
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: chrono::Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Returns the subject of a genuine, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let Some((signed, signature)) = split_token(token) else {
            return Err(TokenError::Malformed);
        };

        // integrity first: any altered byte, header included, fails here
        match crypto::verify(signature, signed.as_bytes(), &self.decoding_key, Algorithm::HS256) {
            Ok(true) => {}
            _ => return Err(TokenError::SignatureInvalid),
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::SignatureInvalid)?;

        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

/// Splits `header.payload.signature` into the signed part and the signature.
/// `None` unless there are exactly three non-empty base64url segments.
fn split_token(token: &str) -> Option<(&str, &str)> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || !segments.iter().all(|s| is_base64url(s)) {
        return None;
    }

    let signed_len = segments[0].len() + 1 + segments[1].len();
    Some((&token[..signed_len], segments[2]))
}

fn is_base64url(segment: &str) -> bool {
    // a single trailing sextet can't encode a whole byte
    !segment.is_empty()
        && segment.len() % 4 != 1
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
