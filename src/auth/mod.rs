/// Authentication module
///
/// Handles JWT token generation/validation, password hashing,
/// registration/login, refresh token rotation and session cookies.

mod claims;
mod cookies;
mod credentials;
mod jwt;
mod password;
mod refresh_token;

pub use claims::Claims;
pub use cookies::{CookiePolicy, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use credentials::{authenticate, register_user};
pub use jwt::{
    generate_access_token, generate_token, issue_token_pair, validate_access_token,
    validate_token, TokenKind, TokenPair,
};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use refresh_token::refresh_session;
