use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/assignments",
            get(handlers::assignment::list_assignments).post(handlers::assignment::submit_assignments),
        )
        .route(
            "/api/assignments/count",
            get(handlers::assignment::count_assignments),
        )
        .route(
            "/api/assignments/:id",
            put(handlers::assignment::update_assignment)
                .delete(handlers::assignment::delete_assignment),
        )
}
