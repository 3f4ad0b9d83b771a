// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::handlers;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))

            // Parameters
            .service(
                web::scope("/parameters")
                    .route("/extract", web::post().to(handlers::extract_template_parameters))
                    .route("/bind", web::post().to(handlers::bind_parameters))
            )

            // Rendering
            .route("/chart", web::post().to(handlers::map_chart))
            .route("/table", web::post().to(handlers::table_page))
            .route("/export", web::post().to(handlers::export_table))
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
