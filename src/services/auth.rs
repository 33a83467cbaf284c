use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// The authenticated caller, extracted from a session JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Validates session JWTs issued by the managed auth service.
///
/// Tokens are HS256, signed with the project's JWT secret, and carry the
/// `authenticated` audience. Validation happens locally so no round trip
/// to the auth service is needed per request.
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["authenticated"]);

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token and extract the caller's identity
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(AuthUser {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }

    /// Authenticate an HTTP request from its Authorization header
    pub fn authenticate(&self, req: &HttpRequest) -> Result<AuthUser, AuthError> {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(AuthError::MissingToken)?;

        self.verify(token.trim())
    }
}

/// Whether the caller's email is on the admin allowlist
pub fn is_admin(user: &AuthUser, admin_emails: &[String]) -> bool {
    match &user.email {
        Some(email) => admin_emails.iter().any(|a| a.eq_ignore_ascii_case(email)),
        None => false,
    }
}
