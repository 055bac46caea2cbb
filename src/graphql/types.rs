use async_graphql::{InputObject, SimpleObject, ID};
use std::fmt;

use crate::store::User;

/// Public view of a user. Has no field for the password hash.
#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "User")]
pub struct UserView {
    pub id: ID,
    pub email: String,
    pub name: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: ID(user.id.to_hex()),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Result of `register` and `login`. The refresh token is only sent as a cookie.
#[derive(SimpleObject, Debug, Clone)]
pub struct AuthPayload {
    pub access_token: String,
    pub user: UserView,
}

#[derive(InputObject)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}
