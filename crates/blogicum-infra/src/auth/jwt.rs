//! Bearer tokens as JWTs, implementing the [`TokenService`] port.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blogicum_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "blogicum".to_string(),
        }
    }
}

/// Wire form of the claims. The subject is the user id; there is no role
/// claim because authorship is the only privilege the API knows.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    username: String,
    iss: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: TimeDelta,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expiration: TimeDelta::hours(config.expiration_hours),
            issuer: config.issuer,
        }
    }

    /// Configuration from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and
    /// `JWT_ISSUER`, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);
        if secret == DEFAULT_SECRET {
            tracing::warn!("JWT_SECRET is unset; tokens are signed with the default secret");
        }

        Self::new(JwtConfig {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        })
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = WireClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: issued.timestamp(),
            exp: (issued + self.expiration).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            username: data.claims.username,
            exp: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.expiration.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "unit-test-secret".to_string(),
            expiration_hours: 2,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_roundtrip_preserves_identity() {
        let svc = service("blogicum-test");
        let user_id = Uuid::new_v4();

        let token = svc.generate_token(user_id, "blogger").unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "blogger");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let svc = service("blogicum-test");
        assert!(matches!(
            svc.validate_token("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_issuer_mismatch_is_rejected() {
        let minted_by = service("issuer-a");
        let checked_by = service("issuer-b");

        let token = minted_by.generate_token(Uuid::new_v4(), "blogger").unwrap();
        assert!(checked_by.validate_token(&token).is_err());
    }

    #[test]
    fn test_expiration_matches_config() {
        assert_eq!(service("blogicum-test").expiration_seconds(), 2 * 3600);
    }
}
