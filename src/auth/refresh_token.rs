/// Refresh Token Rotation
///
/// Redeems a refresh token for a new token pair. Rotation is stateless:
/// nothing is recorded or revoked server-side, the caller overwrites both
/// cookies with the new pair.

use crate::auth::jwt::{issue_token_pair, validate_token, TokenKind, TokenPair};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{CredentialStore, User};

/// Exchange a refresh token for a fresh token pair
///
/// Steps:
/// 1. Token must be present
/// 2. Signature, expiry and issuer are checked against the refresh secret
/// 3. The subject must still exist in the credential store
/// 4. A new access/refresh pair is issued for that user
///
/// # Errors
/// Every verification or lookup failure is reported as
/// `AuthError::InvalidRefreshToken`. Store failures propagate unchanged.
pub async fn refresh_session(
    store: &dyn CredentialStore,
    config: &JwtSettings,
    refresh_token: Option<&str>,
) -> Result<(User, TokenPair), AppError> {
    let token = refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| rejected("missing refresh token"))?;

    let claims = validate_token(TokenKind::Refresh, token, config)
        .map_err(|_| rejected("refresh token failed verification"))?;

    let user_id = claims
        .user_id()
        .map_err(|_| rejected("refresh token subject is not a user id"))?;

    let user = store
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| rejected("refresh token subject no longer exists"))?;

    let pair = issue_token_pair(&user, config)?;

    tracing::debug!(user_id = %user.id, "Refresh token redeemed");
    Ok((user, pair))
}

fn rejected(reason: &'static str) -> AppError {
    tracing::debug!(reason, "Refresh token rejected");
    AppError::Auth(AuthError::InvalidRefreshToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_token;
    use crate::store::InMemoryCredentialStore;
    use mongodb::bson::oid::ObjectId;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-access-secret-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
        }
    }

    async fn store_with_user() -> (InMemoryCredentialStore, User) {
        let store = InMemoryCredentialStore::new();
        let user = store
            .create("ada@example.com", "hash", "Ada")
            .await
            .expect("Failed to create user");
        (store, user)
    }

    fn assert_rejected(result: Result<(User, TokenPair), AppError>) {
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn test_valid_refresh_token_issues_new_pair() {
        let config = get_test_config();
        let (store, user) = store_with_user().await;
        let original = issue_token_pair(&user, &config).unwrap();

        let (refreshed_user, pair) =
            refresh_session(&store, &config, Some(original.refresh_token.as_str()))
                .await
                .expect("Refresh should succeed");

        assert_eq!(refreshed_user.id, user.id);
        let access = validate_token(TokenKind::Access, &pair.access_token, &config).unwrap();
        assert_eq!(access.user_id().unwrap(), user.id);
        assert_eq!(access.email, user.email);
        assert!(validate_token(TokenKind::Refresh, &pair.refresh_token, &config).is_ok());
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let config = get_test_config();
        let (store, _) = store_with_user().await;

        assert_rejected(refresh_session(&store, &config, None).await);
        assert_rejected(refresh_session(&store, &config, Some("")).await);
    }

    #[tokio::test]
    async fn test_access_token_cannot_refresh() {
        let config = get_test_config();
        let (store, user) = store_with_user().await;
        let pair = issue_token_pair(&user, &config).unwrap();

        assert_rejected(refresh_session(&store, &config, Some(pair.access_token.as_str())).await);
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_rejected() {
        let mut config = get_test_config();
        let (store, user) = store_with_user().await;

        config.refresh_token_expiry = -60;
        let token = generate_token(TokenKind::Refresh, user.id, &user.email, &config).unwrap();
        config.refresh_token_expiry = 604800;

        assert_rejected(refresh_session(&store, &config, Some(token.as_str())).await);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_rejected() {
        let config = get_test_config();
        let (store, _) = store_with_user().await;
        let token =
            generate_token(TokenKind::Refresh, ObjectId::new(), "ghost@example.com", &config)
                .unwrap();

        assert_rejected(refresh_session(&store, &config, Some(token.as_str())).await);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let config = get_test_config();
        let (store, _) = store_with_user().await;

        assert_rejected(refresh_session(&store, &config, Some("not.a.jwt")).await);
    }
}
