/// Registration and Login
///
/// Validates credentials input and talks to the credential store. Token
/// issuance and cookies are left to the caller.

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MAX_PASSWORD_LENGTH,
};
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::{CredentialStore, User};
use crate::validators::{is_valid_email, is_valid_name};

/// Register a new user
///
/// All field errors are collected before anything touches the store.
///
/// # Errors
/// - Validation: invalid email, name or weak password (one entry per field)
/// - Conflict: email already registered
pub async fn register_user(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
    name: &str,
) -> Result<User, AppError> {
    let mut errors = Vec::new();

    let email = is_valid_email(email).map_err(|e| errors.push(e)).ok();
    let name = is_valid_name(name).map_err(|e| errors.push(e)).ok();
    if let Err(e) = validate_password_strength(password) {
        errors.push(e);
    }

    let (email, name) = match (email, name) {
        (Some(email), Some(name)) if errors.is_empty() => (email, name),
        _ => return Err(AppError::Validation(errors)),
    };

    if store.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = hash_password(password)?;
    store.create(&email, &password_hash, &name).await
}

/// Check an email/password pair
///
/// Unknown email and wrong password produce the same error.
///
/// # Errors
/// - Validation: malformed email or empty password
/// - Auth: invalid credentials
pub async fn authenticate(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let mut errors = Vec::new();

    let email = is_valid_email(email).map_err(|e| errors.push(e)).ok();
    if password.is_empty() {
        errors.push(ValidationError::EmptyField("password"));
    }

    let email = match email {
        Some(email) if errors.is_empty() => email,
        _ => return Err(AppError::Validation(errors)),
    };

    let user = store
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    // A longer password would be truncated by bcrypt and could match a stored prefix
    if password.len() > MAX_PASSWORD_LENGTH || !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    Ok(user)
}
