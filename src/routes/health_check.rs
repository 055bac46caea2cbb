use actix_web::HttpResponse;

/// GET /health_check
///
/// Liveness only; the credential store is not consulted.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
