use axum::{middleware, routing::get, Router};

use crate::{api::handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D500 E-COMMERCE OVERVIEW DASHBOARD
        // ========================================
        .route(
            "/api/d500/date_range",
            get(handlers::d500_ecommerce_overview::get_date_range),
        )
        .route(
            "/api/d500/overview",
            get(handlers::d500_ecommerce_overview::get_overview),
        )
        .route(
            "/api/d500/geolocation",
            get(handlers::d500_ecommerce_overview::get_geolocation),
        )
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
