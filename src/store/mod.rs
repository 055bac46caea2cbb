/// Credential store
///
/// Persists user identity records. The trait is the seam between the
/// authentication flow and the database; handlers receive an
/// `Arc<dyn CredentialStore>` from the composition root.

mod memory;
mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::fmt;

use crate::error::AppError;

pub use memory::InMemoryCredentialStore;
pub use mongo::MongoCredentialStore;

/// A registered user
#[derive(Clone)]
pub struct User {
    pub id: ObjectId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by normalised email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    /// Insert a new user.
    ///
    /// # Errors
    /// Returns a conflict error if the email is already registered.
    async fn create(&self, email: &str, password_hash: &str, name: &str)
        -> Result<User, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: ObjectId::new(),
            email: "test@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            name: "Test".to_string(),
            created_at: Utc::now(),
        };

        let debug = format!("{:?}", user);
        assert!(!debug.contains("$2b$10$secret"));
        assert!(debug.contains("[redacted]"));
    }
}
