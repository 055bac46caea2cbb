/// Session Cookies
///
/// Both tokens travel as httpOnly cookies. `Max-Age` follows the token
/// lifetime; logout sends already-expired replacements.

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};

use crate::auth::jwt::TokenPair;
use crate::configuration::JwtSettings;

pub const ACCESS_TOKEN_COOKIE: &str = "token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub access_max_age: i64,
    pub refresh_max_age: i64,
}

impl CookiePolicy {
    pub fn new(secure: bool, jwt_config: &JwtSettings) -> Self {
        Self {
            secure,
            access_max_age: jwt_config.access_token_expiry,
            refresh_max_age: jwt_config.refresh_token_expiry,
        }
    }

    /// Cookies carrying a freshly issued pair
    pub fn session_cookies(&self, pair: &TokenPair) -> [Cookie<'static>; 2] {
        [
            self.build(ACCESS_TOKEN_COOKIE, pair.access_token.clone())
                .max_age(Duration::seconds(self.access_max_age))
                .finish(),
            self.build(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone())
                .max_age(Duration::seconds(self.refresh_max_age))
                .finish(),
        ]
    }

    /// Empty, already-expired cookies that make the browser drop the session
    pub fn removal_cookies(&self) -> [Cookie<'static>; 2] {
        [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE].map(|name| {
            self.build(name, String::new())
                .max_age(Duration::ZERO)
                .expires(OffsetDateTime::UNIX_EPOCH)
                .finish()
        })
    }

    fn build(&self, name: &'static str, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
    }
}
