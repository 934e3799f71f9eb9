use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers;
use crate::state::AppState;
use crate::utils::error::AppError;

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/tutors", tutor_routes())
        .nest("/bookings", booking_routes())
        .nest("/categories", category_routes())
        .nest("/reviews", review_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer(&state.config))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::me).patch(handlers::auth::update_me),
        )
}

fn tutor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::tutors::list_tutors))
        .route("/profile", put(handlers::tutors::upsert_profile))
        .route("/availability", put(handlers::tutors::update_availability))
        .route("/:id", get(handlers::tutors::get_tutor))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route(
            "/:id",
            get(handlers::bookings::get_booking).patch(handlers::bookings::update_booking_status),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/:id",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::reviews::create_review))
        .route("/tutor/:tutor_id", get(handlers::reviews::tutor_reviews))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/users/:id", axum::routing::patch(handlers::admin::update_user_status))
        .route("/bookings", get(handlers::admin::list_bookings))
        .route("/statistics", get(handlers::admin::statistics))
}

async fn route_not_found() -> Response {
    AppError::NotFound("Route not found".to_string()).into_response()
}
