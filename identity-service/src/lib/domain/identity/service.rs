use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::IdentityProfile;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::VerifiedSession;
use crate::identity::errors::IdentityError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Domain service implementation for registration, login and token checks.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
}

impl<IR> AuthService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hasher and token signer built from configuration
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Run an Argon2 computation off the async workers.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, IdentityError>
    where
        T: Send + 'static,
        F: FnOnce(&Authenticator) -> T + Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| IdentityError::Internal(format!("Password task failed: {}", e)))
    }
}

#[async_trait]
impl<IR> AuthServicePort for AuthService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<IdentityProfile, IdentityError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::warn!(role = %command.role, "Registration rejected: email already registered");
            return Err(IdentityError::Conflict(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(password.expose()))
            .await??;

        let identity = Identity {
            id: IdentityId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash,
            role: command.role,
            created_at: Utc::now(),
        };

        let created = self.repository.create(identity).await?;

        tracing::info!(
            identity_id = %created.id,
            role = %created.role,
            "Identity registered"
        );

        Ok(IdentityProfile::from(&created))
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<Session, IdentityError> {
        let LoginCommand { email, password } = command;

        let email = match EmailAddress::new(email) {
            Ok(email) if !password.is_empty() => email,
            _ => return Err(IdentityError::InvalidCredentials),
        };

        let identity = match self.repository.find_by_email(&email).await? {
            Some(identity) => identity,
            None => {
                self.run_blocking(move |authenticator| {
                    authenticator.verify_against_dummy(&password)
                })
                .await?;
                tracing::warn!("Authentication failed: unknown identity");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        let stored_hash = identity.password_hash.clone();
        let subject = identity.id.to_string();
        let role = identity.role;
        let issued = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &subject, role.as_str())
            })
            .await?
            .map_err(|e| {
                let err = IdentityError::from(e);
                match &err {
                    IdentityError::InvalidCredentials => tracing::warn!(
                        identity_id = %identity.id,
                        "Authentication failed: wrong password"
                    ),
                    _ => tracing::error!(
                        identity_id = %identity.id,
                        error = %err,
                        "Authentication failed"
                    ),
                }
                err
            })?;

        let expires_at = DateTime::<Utc>::from_timestamp(issued.expires_at, 0).ok_or_else(|| {
            IdentityError::Internal(format!("Token expiry out of range: {}", issued.expires_at))
        })?;

        tracing::info!(
            identity_id = %identity.id,
            role = %identity.role,
            "Session issued"
        );

        Ok(Session {
            profile: IdentityProfile::from(&identity),
            token: issued.access_token,
            expires_at,
        })
    }

    fn verify_token(&self, token: &str) -> Result<VerifiedSession, IdentityError> {
        let claims = self.authenticator.validate_token(token)?;

        let identity_id =
            IdentityId::from_string(&claims.sub).map_err(|_| IdentityError::TokenInvalid)?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| IdentityError::TokenInvalid)?;

        Ok(VerifiedSession { identity_id, role })
    }

    async fn current_identity(
        &self,
        session: &VerifiedSession,
    ) -> Result<IdentityProfile, IdentityError> {
        self.repository
            .find_by_id(&session.identity_id)
            .await?
            .map(|identity| IdentityProfile::from(&identity))
            .ok_or(IdentityError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthenticatorConfig;
    use auth::HashingCost;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::identity::models::DisplayName;
    use crate::domain::identity::models::Password;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;
        }
    }

    fn authenticator_with_ttl(ttl: Duration) -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(AuthenticatorConfig {
                secret: b"test-secret-key-for-jwt-signing-at-least-32-bytes".to_vec(),
                issuer: "legiscounsel".to_string(),
                token_ttl: ttl,
                hashing_cost: HashingCost {
                    memory_kib: 8,
                    iterations: 1,
                    parallelism: 1,
                },
            })
            .expect("Failed to build authenticator"),
        )
    }

    fn test_authenticator() -> Arc<Authenticator> {
        authenticator_with_ttl(Duration::days(7))
    }

    fn register_command(email: &str, password: &str, role: Role) -> RegisterCommand {
        RegisterCommand::new(
            EmailAddress::new(email.to_string()).unwrap(),
            DisplayName::new("A".to_string()).unwrap(),
            Password::new(password.to_string()).unwrap(),
            role,
        )
    }

    fn stored_identity(authenticator: &Authenticator, password: &str, role: Role) -> Identity {
        Identity {
            id: IdentityId::new(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            display_name: DisplayName::new("A".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            role,
            created_at: Utc::now(),
        }
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|identity| {
                identity.email.as_str() == "a@x.com"
                    && identity.role == Role::Client
                    && identity.password_hash.starts_with("$argon2id")
                    && !identity.password_hash.contains("pw12345")
            })
            .times(1)
            .returning(|identity| Ok(identity));

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let profile = service
            .register(register_command("a@x.com", "pw12345", Role::Client))
            .await
            .expect("Registration failed");

        assert_eq!(profile.email.as_str(), "a@x.com");
        assert_eq!(profile.display_name.as_str(), "A");
        assert_eq!(profile.role, Role::Client);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let authenticator = test_authenticator();
        let existing = stored_identity(&authenticator, "other", Role::Lawyer);
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service
            .register(register_command("a@x.com", "pw12345", Role::Client))
            .await;
        assert!(matches!(result, Err(IdentityError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_conflict_reported_by_store() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|identity| Err(IdentityError::Conflict(identity.email.to_string())));

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let result = service
            .register(register_command("a@x.com", "pw12345", Role::Admin))
            .await;
        assert!(matches!(result, Err(IdentityError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_storage_failure() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(IdentityError::Internal("connection refused".to_string())));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let result = service
            .register(register_command("a@x.com", "pw12345", Role::Client))
            .await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let authenticator = test_authenticator();
        let identity = stored_identity(&authenticator, "pw12345", Role::Client);
        let identity_id = identity.id;
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let session = service
            .authenticate(login("A@X.com", "pw12345"))
            .await
            .expect("Authentication failed");

        assert_eq!(session.profile.id, identity_id);
        assert!(session.expires_at > Utc::now() + Duration::days(6));

        let verified = service
            .verify_token(&session.token)
            .expect("Token verification failed");
        assert_eq!(verified.identity_id, identity_id);
        assert_eq!(verified.role, Role::Client);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_and_unknown_email_indistinguishable() {
        let authenticator = test_authenticator();
        let identity = stored_identity(&authenticator, "pw12345", Role::Client);
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "a@x.com" {
                    Ok(Some(identity.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthService::new(Arc::new(repository), authenticator);

        let wrong_password = service
            .authenticate(login("a@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .authenticate(login("nobody@x.com", "pw12345"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
        assert!(matches!(unknown_email, IdentityError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_malformed_input() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().times(0);

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        for command in [login("not-an-email", "pw12345"), login("a@x.com", ""), login("", "")] {
            let result = service.authenticate(command).await;
            assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_authenticate_corrupt_stored_hash() {
        let authenticator = test_authenticator();
        let mut identity = stored_identity(&authenticator, "pw12345", Role::Client);
        identity.password_hash = "corrupt".to_string();
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(identity.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.authenticate(login("a@x.com", "pw12345")).await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_verify_token_expired() {
        let authenticator = authenticator_with_ttl(Duration::zero());
        let identity = stored_identity(&authenticator, "pw12345", Role::Lawyer);
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(identity.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let session = service
            .authenticate(login("a@x.com", "pw12345"))
            .await
            .expect("Authentication failed");

        let result = service.verify_token(&session.token);
        assert!(matches!(result, Err(IdentityError::TokenExpired)));
    }

    #[test]
    fn test_verify_token_rejects_foreign_claims() {
        let authenticator = test_authenticator();
        let service = AuthService::new(
            Arc::new(MockTestIdentityRepository::new()),
            Arc::clone(&authenticator),
        );

        let unknown_role = authenticator
            .issue_token(&IdentityId::new().to_string(), "judge")
            .unwrap();
        let bad_subject = authenticator.issue_token("not-a-uuid", "client").unwrap();

        assert!(matches!(
            service.verify_token(&unknown_role.access_token),
            Err(IdentityError::TokenInvalid)
        ));
        assert!(matches!(
            service.verify_token(&bad_subject.access_token),
            Err(IdentityError::TokenInvalid)
        ));
        assert!(matches!(
            service.verify_token("garbage"),
            Err(IdentityError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_current_identity() {
        let authenticator = test_authenticator();
        let identity = stored_identity(&authenticator, "pw12345", Role::Admin);
        let known_id = identity.id;
        let mut repository = MockTestIdentityRepository::new();

        repository.expect_find_by_id().returning(move |id| {
            if *id == known_id {
                Ok(Some(identity.clone()))
            } else {
                Ok(None)
            }
        });

        let service = AuthService::new(Arc::new(repository), authenticator);

        let profile = service
            .current_identity(&VerifiedSession {
                identity_id: known_id,
                role: Role::Admin,
            })
            .await
            .expect("Lookup failed");
        assert_eq!(profile.id, known_id);

        let missing = service
            .current_identity(&VerifiedSession {
                identity_id: IdentityId::new(),
                role: Role::Admin,
            })
            .await;
        assert!(matches!(missing, Err(IdentityError::TokenInvalid)));
    }
}
