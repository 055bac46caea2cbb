use async_graphql::{Context, Object, Result};
use std::sync::Arc;

use super::types::{AuthPayload, LoginInput, RegisterInput, UserView};
use super::{error_context, set_cookies, Session};
use crate::auth::{authenticate, issue_token_pair, refresh_session, register_user, CookiePolicy};
use crate::configuration::JwtSettings;
use crate::store::CredentialStore;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create an account and start a session
    ///
    /// Errors: `BAD_USER_INPUT` with per-field details, `CONFLICT` when the
    /// email is taken.
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthPayload> {
        let context = error_context(ctx, "user_registration");
        let store = ctx.data::<Arc<dyn CredentialStore>>()?;
        let jwt_config = ctx.data::<JwtSettings>()?;
        let policy = ctx.data::<CookiePolicy>()?;

        let user = register_user(store.as_ref(), &input.email, &input.password, &input.name)
            .await
            .map_err(|e| context.fail(e))?;
        let pair = issue_token_pair(&user, jwt_config).map_err(|e| context.fail(e))?;
        set_cookies(ctx, policy.session_cookies(&pair));

        tracing::info!(
            request_id = %context.request_id,
            user_id = %user.id,
            "User registered successfully"
        );

        Ok(AuthPayload {
            access_token: pair.access_token,
            user: UserView::from(&user),
        })
    }

    /// Start a session with email and password
    ///
    /// Unknown email and wrong password both answer `UNAUTHENTICATED`
    /// with "Invalid credentials".
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let context = error_context(ctx, "user_login");
        let store = ctx.data::<Arc<dyn CredentialStore>>()?;
        let jwt_config = ctx.data::<JwtSettings>()?;
        let policy = ctx.data::<CookiePolicy>()?;

        let user = authenticate(store.as_ref(), &input.email, &input.password)
            .await
            .map_err(|e| context.fail(e))?;
        let pair = issue_token_pair(&user, jwt_config).map_err(|e| context.fail(e))?;
        set_cookies(ctx, policy.session_cookies(&pair));

        tracing::info!(
            request_id = %context.request_id,
            user_id = %user.id,
            "User logged in successfully"
        );

        Ok(AuthPayload {
            access_token: pair.access_token,
            user: UserView::from(&user),
        })
    }

    /// Rotate both session cookies using the `refresh_token` cookie.
    /// Returns the new access token.
    async fn refresh_token(&self, ctx: &Context<'_>) -> Result<String> {
        let context = error_context(ctx, "token_refresh");
        let store = ctx.data::<Arc<dyn CredentialStore>>()?;
        let jwt_config = ctx.data::<JwtSettings>()?;
        let policy = ctx.data::<CookiePolicy>()?;
        let refresh_cookie = ctx
            .data_opt::<Session>()
            .and_then(|s| s.refresh_token.as_deref());

        let (user, pair) = refresh_session(store.as_ref(), jwt_config, refresh_cookie)
            .await
            .map_err(|e| context.fail(e))?;
        set_cookies(ctx, policy.session_cookies(&pair));

        tracing::info!(
            request_id = %context.request_id,
            user_id = %user.id,
            "Token refreshed successfully"
        );

        Ok(pair.access_token)
    }

    /// Clear both session cookies
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let context = error_context(ctx, "user_logout");
        let policy = ctx.data::<CookiePolicy>()?;
        set_cookies(ctx, policy.removal_cookies());

        let user_id = ctx
            .data_opt::<Session>()
            .and_then(|s| s.claims.as_ref())
            .map(|c| c.sub.as_str())
            .unwrap_or("anonymous");
        tracing::info!(request_id = %context.request_id, user_id, "User logged out");

        Ok(true)
    }
}
