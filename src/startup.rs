use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::CookiePolicy;
use crate::configuration::JwtSettings;
use crate::graphql::{build_schema, graphiql, graphql};
use crate::logger::LoggerMiddleware;
use crate::middleware::SessionMiddleware;
use crate::routes::health_check;
use crate::store::CredentialStore;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn CredentialStore>,
    jwt_config: JwtSettings,
    secure_cookies: bool,
) -> Result<Server, std::io::Error> {
    let cookie_policy = CookiePolicy::new(secure_cookies, &jwt_config);
    let schema = web::Data::new(build_schema(store, jwt_config.clone(), cookie_policy));

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            .app_data(schema.clone())
            .route("/health_check", web::get().to(health_check))
            // Session claims are attached here; resolvers decide what needs them
            .service(
                web::resource("/graphql")
                    .wrap(SessionMiddleware::new(jwt_config.clone()))
                    .route(web::post().to(graphql))
                    .route(web::get().to(graphiql)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
