//! JWT verification for identity-provider tokens
//!
//! The identity provider signs HS256 tokens carrying the caller's id, role,
//! and ward. This service only verifies them; `issue` exists for local
//! tooling and tests that need a token without a running provider.

use chrono::{Duration, Utc};
use grievance_core::{Actor, ActorRole};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::IdpConfig;
use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (actor ID)
    pub sub: String,
    /// `citizen` or `nagarasevaka`
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_id: Option<i32>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Convert verified claims into an actor
    ///
    /// # Errors
    /// Returns `InvalidToken` for an empty subject or unknown role
    pub fn actor(&self) -> Result<Actor, AppError> {
        if self.sub.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }
        let role = ActorRole::parse(&self.role).ok_or(AppError::InvalidToken)?;
        Ok(Actor {
            id: self.sub.clone(),
            role,
            ward_id: self.ward_id,
        })
    }
}

/// JWT service for verifying (and, for tooling, issuing) actor tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    leeway_seconds: u64,
}

impl JwtService {
    #[must_use]
    pub fn new(config: &IdpConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            leeway_seconds: config.leeway_seconds,
        }
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns `TokenExpired` for an expired token, `InvalidToken` otherwise
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_seconds;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Verify a bearer token and return the actor it names
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or names an unknown role
    pub fn verify(&self, token: &str) -> Result<Actor, AppError> {
        self.decode_token(token)?.actor()
    }

    /// Sign a token for `actor` valid for `ttl_seconds`
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, actor: &Actor, ttl_seconds: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: actor.id.clone(),
            role: actor.role.as_str().to_string(),
            ward_id: actor.ward_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}
