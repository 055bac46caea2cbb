/// Middleware module
///
/// Custom middleware for session validation.

mod session;

pub use session::SessionMiddleware;
