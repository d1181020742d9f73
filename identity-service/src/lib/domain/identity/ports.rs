use async_trait::async_trait;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::IdentityProfile;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::VerifiedSession;
use crate::identity::errors::IdentityError;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated email, display name, password and role
    ///
    /// # Returns
    /// Public projection of the stored identity
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<IdentityProfile, IdentityError>;

    /// Verify credentials and open a session.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// Public projection plus signed session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or malformed input
    /// * `Internal` - Lookup, verification or signing failed
    async fn authenticate(&self, command: LoginCommand) -> Result<Session, IdentityError>;

    /// Verify a presented session token.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, malformed token or unknown claims
    /// * `TokenExpired` - Validly signed but past expiry
    fn verify_token(&self, token: &str) -> Result<VerifiedSession, IdentityError>;

    /// Resolve a verified session to its identity.
    ///
    /// # Errors
    /// * `TokenInvalid` - Identity no longer exists
    /// * `Internal` - Lookup failed
    async fn current_identity(
        &self,
        session: &VerifiedSession,
    ) -> Result<IdentityProfile, IdentityError>;
}

/// Persistence operations for identity records.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist new identity to storage.
    ///
    /// Uniqueness of the email is enforced by the store itself: under
    /// concurrent calls with the same email exactly one succeeds.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Internal` - Storage operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// Retrieve identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Internal` - Storage operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by identifier.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Internal` - Storage operation failed
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;
}
