use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::MIN_SECRET_LENGTH;
use crate::password::HashingCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Startup configuration for an [`Authenticator`].
#[derive(Clone)]
pub struct AuthenticatorConfig {
    /// HS256 signing secret, at least 32 bytes
    pub secret: Vec<u8>,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Lifetime of issued session tokens
    pub token_ttl: Duration,
    /// Argon2id cost used for new password hashes
    pub hashing_cost: HashingCost,
}

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    dummy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Expiry of the token (Unix timestamp)
    pub expires_at: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid authenticator configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Hashes a throwaway password once so that lookups for unknown
    /// identities can be made to cost the same as a real verification.
    ///
    /// # Arguments
    /// * `config` - Secret, issuer, token lifetime and hashing cost
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Secret too short or negative token lifetime
    /// * `PasswordError` - Hashing cost is invalid
    pub fn new(config: AuthenticatorConfig) -> Result<Self, AuthenticationError> {
        if config.secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthenticationError::InvalidConfiguration(format!(
                "signing secret must be at least {} bytes, got {}",
                MIN_SECRET_LENGTH,
                config.secret.len()
            )));
        }

        if config.token_ttl < Duration::zero() {
            return Err(AuthenticationError::InvalidConfiguration(
                "token lifetime must not be negative".to_string(),
            ));
        }

        let password_hasher = PasswordHasher::new(config.hashing_cost)?;
        let dummy_hash = password_hasher.hash("unregistered-identity-placeholder")?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(&config.secret, config.issuer),
            token_ttl: config.token_ttl,
            dummy_hash,
        })
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Spend the cost of one password verification without a stored hash.
    ///
    /// Used when the identity being authenticated does not exist, so the
    /// response time does not reveal whether an identifier is registered.
    pub fn verify_against_dummy(&self, password: &str) {
        let _ = self.password_hasher.verify(password, &self.dummy_hash);
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity reference written to `sub`
    /// * `role` - Role written to the `role` claim
    ///
    /// # Returns
    /// AuthenticationResult with access token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        role: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject, role)?)
    }

    /// Generate a session token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        subject: &str,
        role: &str,
    ) -> Result<AuthenticationResult, JwtError> {
        self.issue_token_at(subject, role, Utc::now().timestamp())
    }

    /// Generate a session token issued at `now` (Unix timestamp).
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_at(
        &self,
        subject: &str,
        role: &str,
        now: i64,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_session(
            subject,
            role,
            self.jwt_handler.issuer(),
            now,
            self.token_ttl,
        );
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at: claims.exp,
        })
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or format is invalid
    /// * `TokenExpired` - Token is past its expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Validate and decode JWT token against a given instant.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or format is invalid
    /// * `TokenExpired` - `now` is at or past the token expiry
    pub fn validate_token_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        self.jwt_handler.decode_at(token, now)
    }
}
