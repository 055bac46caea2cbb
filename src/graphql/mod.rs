//! GraphQL API
//!
//! Schema construction and the actix-web handlers for `/graphql`.
//! Collaborators (credential store, JWT settings, cookie policy) are
//! attached as schema data once at startup; per-request state (session
//! claims, refresh cookie, request id) is attached as request data.

mod mutation;
mod query;
mod types;

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use actix_web::cookie::Cookie;
use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use std::sync::Arc;

use crate::auth::{Claims, CookiePolicy, REFRESH_TOKEN_COOKIE};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::logger::RequestId;
use crate::store::CredentialStore;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{AuthPayload, LoginInput, RegisterInput, UserView};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Per-request authentication state
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Claims of a valid access token, set by `SessionMiddleware`
    pub claims: Option<Claims>,
    /// Raw `refresh_token` cookie, only read by `refreshToken`
    pub refresh_token: Option<String>,
    pub request_id: Option<String>,
}

impl Session {
    pub fn from_request(req: &HttpRequest) -> Self {
        // Cookie parsing caches into extensions, so read it before borrowing them
        let refresh_token = req
            .cookie(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let extensions = req.extensions();
        Self {
            claims: extensions.get::<Claims>().cloned(),
            refresh_token,
            request_id: extensions.get::<RequestId>().map(|id| id.0.clone()),
        }
    }
}

pub fn build_schema(
    store: Arc<dyn CredentialStore>,
    jwt_config: JwtSettings,
    cookie_policy: CookiePolicy,
) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(jwt_config)
        .data(cookie_policy)
        .finish()
}

/// POST /graphql
pub async fn graphql(
    schema: web::Data<AppSchema>,
    req: HttpRequest,
    gql_request: GraphQLRequest,
) -> GraphQLResponse {
    let session = Session::from_request(&req);
    schema.execute(gql_request.into_inner().data(session)).await.into()
}

/// GET /graphql
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Claims of the current session, or the generic authentication failure
pub(crate) fn require_session<'a>(ctx: &Context<'a>) -> Result<&'a Claims, AppError> {
    ctx.data_opt::<Session>()
        .and_then(|session| session.claims.as_ref())
        .ok_or(AppError::Auth(AuthError::Unauthenticated))
}

pub(crate) fn error_context(ctx: &Context<'_>, operation: &str) -> ErrorContext {
    let context = ErrorContext::new(operation);
    match ctx.data_opt::<Session>().and_then(|s| s.request_id.clone()) {
        Some(request_id) => context.with_request_id(request_id),
        None => context,
    }
}

pub(crate) fn set_cookies<I>(ctx: &Context<'_>, cookies: I)
where
    I: IntoIterator<Item = Cookie<'static>>,
{
    for cookie in cookies {
        ctx.append_http_header("set-cookie", cookie.to_string());
    }
}
