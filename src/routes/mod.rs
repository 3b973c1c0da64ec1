//! Route definitions for the EcoHabits API.

pub mod dashboard;
pub mod footprint;
pub mod habits;
pub mod health;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/{id}", get(users::get_by_id).put(users::update))
        .route("/users/{id}/stats", get(users::stats))
        .route("/users/{id}/badges", get(users::badges))
        .route("/users/{id}/preferences", post(users::update_preferences))
        .route("/users/{id}/dashboard", get(dashboard::get));

    let habit_routes = Router::new()
        .route("/habits", get(habits::list).post(habits::create))
        .route("/habits/summary/weekly", get(habits::weekly_summary))
        .route(
            "/habits/categories/{category}",
            get(habits::list_by_category),
        )
        .route(
            "/habits/{id}",
            get(habits::get_by_id)
                .put(habits::update)
                .delete(habits::delete),
        )
        .route("/habits/{id}/complete", post(habits::complete));

    let footprint_routes =
        Router::new().route("/footprint/calculate", post(footprint::calculate));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(
            "/api/v1",
            user_routes.merge(habit_routes).merge(footprint_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::AUTHORIZATION])
}
