use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::users;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// Lifetime of a file-access token, counted from the issuance instant.
pub const FILE_ACCESS_TTL_MINUTES: i64 = 5;

/// Supplies the HMAC secret used to sign and verify every token.
pub trait SigningKeyProvider: Send + Sync {
    fn signing_secret(&self) -> &[u8];
}

/// Secret fixed at startup, usually from `JWT_SECRET`.
pub struct StaticSigningKey {
    secret: Vec<u8>,
}

impl StaticSigningKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl SigningKeyProvider for StaticSigningKey {
    fn signing_secret(&self) -> &[u8] {
        &self.secret
    }
}

/// Written into the `type` claim. A validator only accepts its own purpose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPurpose {
    Session,
    FileAccess,
}

/// Session token claims, inserted into request extensions by the auth middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    #[serde(rename = "type")]
    pub purpose: TokenPurpose,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Claims of a token that grants read access to exactly one file.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileAccessClaims {
    pub file_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub purpose: TokenPurpose,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates session and file-access JWTs (HS256).
pub struct TokenService {
    keys: Arc<dyn SigningKeyProvider>,
    issuer: String,
    audience: String,
    session_ttl: Duration,
}

impl TokenService {
    pub fn new(
        keys: Arc<dyn SigningKeyProvider>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            session_ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(StaticSigningKey::new(config.jwt_secret.as_bytes())),
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            Duration::hours(config.session_ttl_hours),
        )
    }

    pub fn issue_session(&self, user: &users::Model) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            purpose: TokenPurpose::Session,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at,
        })
    }

    /// Returns the claims of a valid, unexpired session token.
    pub fn validate_session(&self, token: &str) -> Option<Claims> {
        let claims: Claims = self.verify(token)?;
        (claims.purpose == TokenPurpose::Session).then_some(claims)
    }

    pub fn issue_file_access(&self, file_id: &str, user_id: &str) -> Result<IssuedToken, AppError> {
        self.issue_file_access_at(file_id, user_id, Utc::now())
    }

    /// Same as [`issue_file_access`](Self::issue_file_access) with an explicit issuance instant.
    pub fn issue_file_access_at(
        &self,
        file_id: &str,
        user_id: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = issued_at + Duration::minutes(FILE_ACCESS_TTL_MINUTES);

        let claims = FileAccessClaims {
            file_id: file_id.to_owned(),
            user_id: user_id.to_owned(),
            purpose: TokenPurpose::FileAccess,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at,
        })
    }

    /// Fails closed: any decoding, signature, issuer, audience, expiry, purpose or
    /// file id problem yields `false`.
    pub fn validate_file_access(&self, token: &str, expected_file_id: &str) -> bool {
        self.verify::<FileAccessClaims>(token).is_some_and(|claims| {
            claims.purpose == TokenPurpose::FileAccess && claims.file_id == expected_file_id
        })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.keys.signing_secret()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Option<T> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;

        match decode::<T>(
            token,
            &DecodingKey::from_secret(self.keys.signing_secret()),
            &validation,
        ) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(
            Arc::new(StaticSigningKey::new(secret)),
            "test-issuer",
            "test-audience",
            Duration::hours(24),
        )
    }

    fn user() -> users::Model {
        users::Model {
            id: "user_123".to_string(),
            username: "alice".to_string(),
            password_hash: "irrelevant".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_cycle() {
        let tokens = service("test_secret");
        let issued = tokens.issue_session(&user()).unwrap();
        let claims = tokens.validate_session(&issued.token).unwrap();
        assert_eq!(claims.sub, "user_123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.purpose, TokenPurpose::Session);
    }

    #[test]
    fn test_file_access_scoped_to_one_file() {
        let tokens = service("test_secret");
        let issued = tokens.issue_file_access("F1", "U1").unwrap();
        assert!(tokens.validate_file_access(&issued.token, "F1"));
        assert!(!tokens.validate_file_access(&issued.token, "F2"));
    }

    #[test]
    fn test_file_access_expires_after_five_minutes() {
        let tokens = service("test_secret");

        let fresh = tokens
            .issue_file_access_at("F1", "U1", Utc::now() - Duration::minutes(4))
            .unwrap();
        assert!(tokens.validate_file_access(&fresh.token, "F1"));

        let stale = tokens
            .issue_file_access_at("F1", "U1", Utc::now() - Duration::minutes(6))
            .unwrap();
        assert!(!tokens.validate_file_access(&stale.token, "F1"));
    }

    #[test]
    fn test_expires_at_is_five_minutes_after_issuance() {
        let tokens = service("test_secret");
        let now = Utc::now();
        let issued = tokens.issue_file_access_at("F1", "U1", now).unwrap();
        assert_eq!(issued.expires_at - now, Duration::minutes(5));
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let tokens = service("test_secret");
        let session = tokens.issue_session(&user()).unwrap();
        let access = tokens.issue_file_access("F1", "U1").unwrap();

        assert!(!tokens.validate_file_access(&session.token, "F1"));
        assert!(tokens.validate_session(&access.token).is_none());
    }

    #[test]
    fn test_wrong_secret_issuer_or_audience_fails_closed() {
        let issued = service("secret_a").issue_file_access("F1", "U1").unwrap();
        assert!(!service("secret_b").validate_file_access(&issued.token, "F1"));

        let other_issuer = TokenService::new(
            Arc::new(StaticSigningKey::new("secret_a")),
            "someone-else",
            "test-audience",
            Duration::hours(1),
        );
        assert!(!other_issuer.validate_file_access(&issued.token, "F1"));

        let other_audience = TokenService::new(
            Arc::new(StaticSigningKey::new("secret_a")),
            "test-issuer",
            "another-app",
            Duration::hours(1),
        );
        assert!(!other_audience.validate_file_access(&issued.token, "F1"));
    }

    #[test]
    fn test_garbage_token_fails_closed() {
        let tokens = service("test_secret");
        assert!(!tokens.validate_file_access("", "F1"));
        assert!(!tokens.validate_file_access("not.a.jwt", "F1"));
        assert!(tokens.validate_session("garbage").is_none());
    }
}
