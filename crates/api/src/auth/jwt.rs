//! Access and refresh token primitives.
//!
//! An access token is a short-lived HS256 JWT carrying the user id and
//! role; handlers trust it without a database round trip. A refresh token
//! is an opaque random string with a row in `sessions`: the database keeps
//! only its SHA-256 digest, so leaking the table does not leak usable
//! tokens.

use balcao_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub sub: DbId,
    /// Role name, one of the seeded roles.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// Random token id, logged for audit trails.
    pub jti: String,
}

/// A freshly minted refresh token.
///
/// `plaintext` goes to the client and is never stored; `digest` is what
/// the sessions table keeps.
pub struct RefreshToken {
    pub plaintext: String,
    pub digest: String,
}

/// Signing key and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load from the environment.
    ///
    /// `JWT_SECRET` is required and must be non-empty; there is no safe
    /// default for a signing key, so a missing secret aborts startup.
    /// `JWT_ACCESS_EXPIRY_MINS` defaults to 15 and
    /// `JWT_REFRESH_EXPIRY_DAYS` to 7.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = env_i64("JWT_ACCESS_EXPIRY_MINS", 15);
        let refresh_token_expiry_days = env_i64("JWT_REFRESH_EXPIRY_DAYS", 7);

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Sign an access token for the user. Returns the token and its
    /// expiry as a Unix timestamp.
    pub fn issue_access_token(
        &self,
        user_id: DbId,
        role: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let iat = chrono::Utc::now().timestamp();
        let exp = iat + self.access_token_expiry_mins * 60;

        let claims = AccessClaims {
            sub: user_id,
            role: role.to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok((token, exp))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

fn env_i64(var: &str, default: i64) -> i64 {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{var} must be a valid integer")),
        Err(_) => default,
    }
}

/// Mint a refresh token.
pub fn mint_refresh_token() -> RefreshToken {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    RefreshToken { plaintext, digest }
}

/// SHA-256 hex digest of a refresh token, for session lookup.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(access_mins: i64) -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-key-0123456789".into(),
            access_token_expiry_mins: access_mins,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let cfg = config(15);
        let (token, exp) = cfg.issue_access_token(7, "comercial").unwrap();

        let claims = cfg.decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "comercial");
        assert_eq!(claims.exp, exp);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative lifetime puts exp in the past, beyond the default
        // 60-second validation leeway.
        let cfg = config(-5);
        let (token, _) = cfg.issue_access_token(1, "tecnico").unwrap();
        assert!(cfg.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let (token, _) = config(15).issue_access_token(1, "admin").unwrap();

        let other = JwtConfig {
            secret: "a-different-signing-key".into(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        };
        assert!(other.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_digest_matches_rehash() {
        let minted = mint_refresh_token();
        assert_eq!(minted.digest, hash_refresh_token(&minted.plaintext));
        assert_ne!(minted.digest, minted.plaintext);
        assert_eq!(minted.digest.len(), 64);
    }
}
