pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::categories::handlers as categories;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Categories
        .route(
            "/categories",
            get(categories::handle_list_categories).post(categories::handle_create_category),
        )
        .route(
            "/categories/:id",
            put(categories::handle_update_category).delete(categories::handle_delete_category),
        )
        // Applications
        .route(
            "/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application)
                .put(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        .route(
            "/applications/upload",
            post(applications::handle_upload_application)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/applications/status", put(applications::handle_change_status))
        .route("/applications/stats", get(applications::handle_status_summary))
        .route("/applications/:id", get(applications::handle_get_application))
        .route("/dashboard", get(applications::handle_dashboard))
        .with_state(state)
}
