use crate::config::Config;
use crate::error::{auth_error, AppResult};
use crate::models::{Role, Section, UserAccount, UserSummary};
use crate::store::Repository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::http::{header, request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE: &str = "auth_token";

/// User credentials structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Name (username)
    pub name: Option<String>,
    pub role: Role,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// Answer to a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
    /// Sections the user may open
    pub sections: Vec<Section>,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// JWT secret for signing/verifying tokens
    pub jwt_secret: String,
    /// Token expiration time in minutes
    pub token_expiration_minutes: i64,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_expiration_minutes: config.token_expiration_minutes,
        }
    }
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// Token is missing
    MissingToken,
    /// Token is invalid or expired
    InvalidToken,
    /// Wrong username or password
    InvalidCredentials,
    /// Role does not grant the section
    Forbidden(Section),
    /// Some other error
    Other(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing token".to_string()),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AuthError::Forbidden(section) => (
                StatusCode::FORBIDDEN,
                format!("Access to {:?} denied", section),
            ),
            AuthError::Other(err) => {
                error!("Auth error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Authenticated caller, placed in request extensions by the middleware
#[derive(Debug, Clone)]
pub struct JwtAuth {
    pub claims: Claims,
}

impl JwtAuth {
    /// Fail unless the caller's role grants the section
    pub fn require(&self, section: Section) -> Result<(), AuthError> {
        if self.claims.role.can_access(section) {
            Ok(())
        } else {
            warn!(
                "{} ({}) denied access to {:?}",
                self.claims.name.as_deref().unwrap_or(&self.claims.sub),
                self.claims.role,
                section
            );
            Err(AuthError::Forbidden(section))
        }
    }
}

/// Extract the JWT from the auth cookie or the Authorization header
pub fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    // First check for token in cookies
    if let Some(cookie) = parts.headers.get(header::COOKIE) {
        let cookie_str = cookie.to_str().map_err(|_| AuthError::InvalidToken)?;
        for cookie_pair in cookie_str.split(';') {
            if let Some((AUTH_COOKIE, value)) = cookie_pair.trim().split_once('=') {
                return Ok(value.to_string());
            }
        }
    }

    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or(AuthError::InvalidToken)
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| auth_error(&format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        warn!("Stored password hash is malformed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Auth service for logins and token operations
pub struct AuthService {
    config: Arc<AuthConfig>,
    users: Repository<UserAccount>,
}

impl AuthService {
    pub fn new(config: AuthConfig, users: Repository<UserAccount>) -> Self {
        Self {
            config: Arc::new(config),
            users,
        }
    }

    /// Check credentials against the user accounts and open a session
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let accounts = self
            .users
            .list()
            .await
            .map_err(|e| AuthError::Other(e.to_string()))?;

        let account = accounts
            .into_iter()
            .find(|account| account.username == username)
            .filter(|account| verify_password(password, &account.password_hash))
            .ok_or_else(|| {
                warn!("Failed login for {}", username);
                AuthError::InvalidCredentials
            })?;

        let user_id = account.id.clone().unwrap_or_else(|| username.to_string());
        let token = self
            .generate_token(&user_id, Some(account.username.clone()), account.role)
            .map_err(AuthError::Other)?;

        info!("{} logged in as {}", account.username, account.role);
        Ok(LoginResponse {
            token,
            sections: account.role.sections().to_vec(),
            user: UserSummary::from(&account),
        })
    }

    /// Generate a new JWT token
    pub fn generate_token(
        &self,
        user_id: &str,
        name: Option<String>,
        role: Role,
    ) -> Result<String, String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.token_expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name,
            role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| format!("Failed to generate token: {}", e))
    }

    /// Validate a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| {
            warn!("JWT validation error: {:?}", e);
            AuthError::InvalidToken
        })
    }

    /// Validate a token against the stored accounts. The role is taken from
    /// the account, and a deleted account ends the session.
    pub async fn session(&self, token: &str) -> Result<Claims, AuthError> {
        let mut claims = self.validate_token(token)?;
        let account = self
            .users
            .get(&claims.sub)
            .await
            .map_err(|e| AuthError::Other(e.to_string()))?
            .ok_or_else(|| {
                warn!("Token for unknown account {}", claims.sub);
                AuthError::InvalidToken
            })?;

        claims.role = account.role;
        claims.name = Some(account.username);
        Ok(claims)
    }
}
