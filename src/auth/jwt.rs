/// JWT Token Generation and Validation
///
/// Access and refresh tokens share the claim shape but are signed with
/// different secrets, so a token of one kind never validates as the other.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ConfigError};
use crate::store::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn secret(self, config: &JwtSettings) -> Result<&[u8], AppError> {
        let (secret, name) = match self {
            TokenKind::Access => (&config.secret, "JWT_SECRET"),
            TokenKind::Refresh => (&config.refresh_secret, "JWT_REFRESH_SECRET"),
        };
        if secret.is_empty() {
            return Err(ConfigError::MissingRequired(name.to_string()).into());
        }
        Ok(secret.as_bytes())
    }

    fn expiry(self, config: &JwtSettings) -> i64 {
        match self {
            TokenKind::Access => config.access_token_expiry,
            TokenKind::Refresh => config.refresh_token_expiry,
        }
    }
}

/// A freshly minted access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Sign a token of the given kind for a user
///
/// # Errors
/// Returns a configuration error if the signing secret is empty, or an
/// internal error if encoding fails
pub fn generate_token(
    kind: TokenKind,
    user_id: ObjectId,
    email: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let secret = kind.secret(config)?;
    let claims = Claims::new(
        user_id,
        email.to_string(),
        kind.expiry(config),
        config.issuer.clone(),
    );

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate a token of the given kind and extract its claims
///
/// Signature, expiry and issuer are all checked. Every failure maps to
/// the same `Unauthenticated` error.
pub fn validate_token(
    kind: TokenKind,
    token: &str,
    config: &JwtSettings,
) -> Result<Claims, AppError> {
    let secret = kind.secret(config)?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(kind = ?kind, "JWT validation error: {}", e);
            AppError::Auth(AuthError::Unauthenticated)
        })
}

pub fn generate_access_token(
    user_id: ObjectId,
    email: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    generate_token(TokenKind::Access, user_id, email, config)
}

pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    validate_token(TokenKind::Access, token, config)
}

/// Issue an access token and a refresh token for the same user
pub fn issue_token_pair(user: &User, config: &JwtSettings) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: generate_token(TokenKind::Access, user.id, &user.email, config)?,
        refresh_token: generate_token(TokenKind::Refresh, user.id, &user.email, config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-access-secret-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
        }
    }

    fn test_user() -> User {
        User {
            id: ObjectId::new(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = get_test_config();
        let user_id = ObjectId::new();
        let email = "test@example.com";

        let token = generate_access_token(user_id, email, &config).expect("Failed to generate token");
        let claims = validate_access_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.iss, "test");
    }

    #[test]
    fn test_token_pair_lifetimes() {
        let config = get_test_config();
        let user = test_user();
        let pair = issue_token_pair(&user, &config).unwrap();

        let access = validate_token(TokenKind::Access, &pair.access_token, &config).unwrap();
        let refresh = validate_token(TokenKind::Refresh, &pair.refresh_token, &config).unwrap();

        assert_eq!(access.sub, user.id.to_hex());
        assert_eq!(refresh.sub, user.id.to_hex());
        assert_eq!(access.exp - access.iat, 900);
        assert_eq!(refresh.exp - refresh.iat, 604800);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_user(), &config).unwrap();

        assert!(validate_token(TokenKind::Access, &pair.refresh_token, &config).is_err());
        assert!(validate_token(TokenKind::Refresh, &pair.access_token, &config).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let config = get_test_config();
        let result = validate_access_token("invalid.token.here", &config);

        assert!(matches!(result, Err(AppError::Auth(AuthError::Unauthenticated))));
    }

    #[test]
    fn test_tampered_token() {
        let config = get_test_config();
        let token = generate_access_token(ObjectId::new(), "test@example.com", &config)
            .expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config = get_test_config();
        let token = generate_access_token(ObjectId::new(), "test@example.com", &config)
            .expect("Failed to generate token");

        let mut other = get_test_config();
        other.secret = "a-completely-different-secret-value-here".to_string();
        assert!(validate_access_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token() {
        let mut config = get_test_config();
        config.access_token_expiry = -60;
        let token = generate_access_token(ObjectId::new(), "test@example.com", &config)
            .expect("Failed to generate token");

        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut config = get_test_config();
        let token = generate_access_token(ObjectId::new(), "test@example.com", &config)
            .expect("Failed to generate token");

        config.issuer = "wrong-issuer".to_string();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_empty_secret_is_a_configuration_error() {
        let mut config = get_test_config();
        config.refresh_secret = String::new();

        let result = issue_token_pair(&test_user(), &config);
        assert!(matches!(result, Err(AppError::Config(ConfigError::MissingRequired(_)))));
    }
}
