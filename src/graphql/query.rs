use async_graphql::{Context, Object, Result};
use std::sync::Arc;

use super::types::UserView;
use super::{error_context, require_session};
use crate::error::AppError;
use crate::store::CredentialStore;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The user behind the current session
    async fn me(&self, ctx: &Context<'_>) -> Result<UserView> {
        let context = error_context(ctx, "current_user");
        let claims = require_session(ctx).map_err(|e| context.fail(e))?;
        let context = context.with_user_id(claims.sub.clone());

        let store = ctx.data::<Arc<dyn CredentialStore>>()?;
        let user_id = claims.user_id().map_err(|e| context.fail(e))?;
        let user = store
            .find_by_id(&user_id)
            .await
            .and_then(|user| user.ok_or_else(|| AppError::not_found("User not found")))
            .map_err(|e| context.fail(e))?;

        Ok(UserView::from(&user))
    }
}
