use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Minimum secret length accepted for HS256 signing.
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT token handler for encoding and decoding session tokens.
///
/// Uses HS256 (HMAC with SHA-256). Keys are derived once at construction and
/// only read afterwards, so a handler can be shared across threads freely.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `issuer` - Value written to and required in the `iss` claim
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: impl ToString) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.to_string(),
        }
    }

    /// Issuer name stamped into every token.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Encode claims into a signed JWT token.
    ///
    /// Claims must carry this handler's issuer; anything else would produce a
    /// token the handler itself rejects.
    ///
    /// # Errors
    /// * `EncodingFailed` - Issuer mismatch or token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        if claims.iss != self.issuer {
            return Err(JwtError::EncodingFailed(format!(
                "issuer '{}' does not match handler issuer '{}'",
                claims.iss, self.issuer
            )));
        }

        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token against the current time.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, algorithm, issuer or format is invalid
    /// * `TokenExpired` - Token is validly signed but past its expiry
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a JWT token against a given instant.
    ///
    /// The signature is checked before expiry, so a forged token is always
    /// reported as invalid even when its claimed expiry has passed.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    /// * `now` - Current time (Unix timestamp)
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, algorithm, issuer or format is invalid
    /// * `TokenExpired` - `now` is at or past the `exp` claim
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below with an exact boundary and no leeway
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.set_issuer(&[self.issuer.as_str()]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        if token_data.claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
