use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{CredentialStore, User};
use crate::error::AppError;

/// Process-local credential store, keyed by user id.
///
/// Used by the test suite and for running the server without MongoDB.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, AppError> {
        // Write lock held across check and insert, like a unique index
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(AppError::conflict("Email already registered"));
        }

        let user = User {
            id: ObjectId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryCredentialStore::new();
        let user = store
            .create("ada@example.com", "hash", "Ada")
            .await
            .expect("Failed to create user");

        let by_email = store.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let by_id = store.find_by_id(&user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some("ada@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let store = InMemoryCredentialStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(&ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryCredentialStore::new();
        let first = store.create("ada@example.com", "hash-1", "Ada").await.unwrap();

        let result = store.create("ada@example.com", "hash-2", "Impostor").await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_)))
        ));

        // First user is untouched
        let stored = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.password_hash, "hash-1");
        assert_eq!(store.len().await, 1);
    }
}
