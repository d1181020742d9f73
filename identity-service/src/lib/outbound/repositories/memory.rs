use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

/// Process-local identity store.
///
/// Keyed by normalized email; the uniqueness check and the insert happen
/// under one write lock, so concurrent registrations of the same email
/// resolve to exactly one success.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<EmailAddress, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if identities.contains_key(&identity.email) {
            return Err(IdentityError::Conflict(identity.email.to_string()));
        }

        identities.insert(identity.email.clone(), identity.clone());
        Ok(identity)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.read().await.get(email).cloned())
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.id == *id)
            .cloned())
    }
}
