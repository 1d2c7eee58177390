use axum::{
    middleware,
    routing::{get, get_service, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{contact, facebook, handlers, instagram, middleware::metrics_middleware, progress, youtube};
use crate::state::AppState;

/// Informational pages served as-is from the pages directory.
const STATIC_PAGES: &[&str] = &[
    "guides", "faq", "about", "help", "credits", "privacy", "terms",
];

pub fn create_router(state: Arc<AppState>) -> Router {
    let page = |name: &str| ServeFile::new(state.page(name));

    let mut router = Router::new()
        // Service endpoints
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // YouTube
        .route("/", get_service(page("index")))
        .route("/fetch", post(youtube::fetch))
        .route("/download", post(youtube::download))
        // Progress
        .route("/progress", get(progress::latest))
        .route("/progress/{id}", get(progress::get_progress))
        // Facebook
        .route("/facebook", get_service(page("facebook")))
        .route("/facebook/download", post(facebook::download))
        // Instagram
        .route("/instagram", get_service(page("instagram")))
        .route("/instagram/download", post(instagram::download))
        // Contact and feedback
        .route(
            "/contact",
            get_service(page("contact")).post(contact::submit_contact),
        )
        .route(
            "/feedback",
            get_service(page("feedback")).post(contact::submit_feedback),
        );

    for &name in STATIC_PAGES {
        router = router.route(&format!("/{}", name), get_service(page(name)));
    }

    // Stylesheets, scripts and images next to the pages
    let assets = ServeDir::new(state.pages_dir().join("static"));

    router
        .nest_service("/static", assets)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
