//! Credential login service.
//!
//! Verifies email/password pairs against a user store, issues one-hour HS256
//! tokens, and exposes the session endpoints a browser login form needs.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use config::Config;
pub use error::{AppError, LoginError};
pub use handlers::http::AppState;

use std::path::{Path, PathBuf};

use axum::routing::{get, get_service, post, MethodRouter};
use handlers::http;
use tower_http::services::ServeFile;

/// Build the API router (auth, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/session", get(auth::session))
        .route("/signout", post(auth::sign_out))
        .route("/signin/:provider", get(auth::provider_sign_in));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/api/auth", auth_routes)
        .layer(middleware::trace::layer())
        .with_state(state)
}

fn page(path: PathBuf) -> MethodRouter {
    get_service(ServeFile::new(path))
}

/// Add the login and registration pages, served from `static_dir`.
pub fn with_pages(app: axum::Router, static_dir: &Path) -> axum::Router {
    let login = static_dir.join("login.html");
    let register = static_dir.join("register.html");
    app.route_service("/login", page(login.clone()))
        .route_service("/login.html", page(login))
        .route_service("/register", page(register.clone()))
        .route_service("/register.html", page(register))
}
