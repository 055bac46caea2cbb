/// Session Middleware
///
/// Validates the access token from the `token` cookie and injects the
/// claims into request extensions for use by the GraphQL handler.
///
/// The middleware never rejects a request by itself: `register` and
/// `login` share the endpoint with protected fields. A request with a
/// missing or invalid cookie simply carries no identity, and protected
/// resolvers answer `UNAUTHENTICATED`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{validate_access_token, ACCESS_TOKEN_COOKIE};
use crate::configuration::JwtSettings;

pub struct SessionMiddleware {
    jwt_config: JwtSettings,
}

impl SessionMiddleware {
    pub fn new(jwt_config: JwtSettings) -> Self {
        Self { jwt_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .cookie(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        if let Some(token) = token {
            match validate_access_token(&token, &self.jwt_config) {
                Ok(claims) => {
                    tracing::debug!(user_id = %claims.sub, "Session validated");
                    req.extensions_mut().insert(claims);
                }
                Err(e) => {
                    tracing::debug!("Session cookie rejected: {}", e);
                }
            }
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
