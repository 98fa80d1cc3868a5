use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/instructors", get(handlers::catalog::list_instructors))
        .route("/api/instructors/:id", get(handlers::catalog::get_instructor))
        .route("/api/courses", get(handlers::catalog::list_courses))
        .route("/api/courses/grouped", get(handlers::catalog::grouped_courses))
        .route("/api/courses/:id", get(handlers::catalog::get_course))
        .route("/api/catalog/refresh", post(handlers::catalog::refresh_catalog))
}
