use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::{
    ClientOptions, Collation, CollationStrength, FindOneOptions, IndexOptions,
};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use super::{CredentialStore, User};
use crate::configuration::DatabaseSettings;
use crate::error::{AppError, ConfigError};

const USERS_COLLECTION: &str = "users";
const EMAIL_INDEX: &str = "email_case_insensitive";

/// Case-insensitive comparison for email lookups and the unique index.
/// New users are stored lowercased; older records may keep their typed case.
fn email_collation() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

/// Stored shape of a user document in the `users` collection
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    password_hash: String,
    name: String,
    created_at: BsonDateTime,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id,
            email: doc.email,
            password_hash: doc.password_hash,
            name: doc.name,
            created_at: DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        UserDocument {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            name: user.name.clone(),
            created_at: BsonDateTime::from_millis(user.created_at.timestamp_millis()),
        }
    }
}

/// MongoDB-backed credential store
#[derive(Clone)]
pub struct MongoCredentialStore {
    users: Collection<UserDocument>,
}

impl MongoCredentialStore {
    /// Connect, ping the server and make sure the unique email index exists.
    ///
    /// # Errors
    /// Returns a configuration error for a malformed URI and a database
    /// error if the server cannot be reached.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, AppError> {
        let options = ClientOptions::parse(settings.uri.as_str())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to parse MONGODB_URI");
                ConfigError::InvalidValue("MONGODB_URI could not be parsed".to_string())
            })?;

        let client = Client::with_options(options)?;
        let database = client.database(&settings.database_name);
        database.run_command(doc! { "ping": 1 }, None).await?;

        let users = database.collection::<UserDocument>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name(EMAIL_INDEX.to_string())
                    .unique(true)
                    .collation(email_collation())
                    .build(),
            )
            .build();
        users.create_index(email_index, None).await?;

        tracing::info!(
            database = %settings.database_name,
            "Connected to MongoDB credential store"
        );

        Ok(Self { users })
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let options = FindOneOptions::builder()
            .collation(email_collation())
            .build();
        let document = self.users.find_one(doc! { "email": email }, options).await?;
        Ok(document.map(User::from))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let document = self.users.find_one(doc! { "_id": *id }, None).await?;
        Ok(document.map(User::from))
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, AppError> {
        let user = User {
            id: ObjectId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        // Duplicate emails in any case surface as write error 11000, a conflict
        self.users.insert_one(UserDocument::from(&user), None).await?;

        Ok(user)
    }
}
