//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (Argon2id with configurable cost)
//! - Session token issuing and verification (HS256 JWT)
//! - Authentication coordination
//!
//! The library knows nothing about identities or roles beyond the strings it
//! is handed; the service owns those types and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingCost, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashingCost::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", "legiscounsel");
//! let claims = Claims::for_session("user123", "client", "legiscounsel", 1_000, Duration::hours(1));
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode_at(&token, 1_001).unwrap();
//! assert_eq!(decoded.role, "client");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, AuthenticatorConfig, HashingCost};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(AuthenticatorConfig {
//!     secret: b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     issuer: "legiscounsel".to_string(),
//!     token_ttl: Duration::days(7),
//!     hashing_cost: HashingCost::default(),
//! })
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "user123", "client").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorConfig;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
