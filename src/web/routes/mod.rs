//! Contains all the routes that this application can handle.

mod emails;
mod export;
mod ops;

use axum::{
    http::{Method, Uri},
    routing::get,
    Router,
};

use crate::{web::Error, AppState};
use emails::{create_email, delete_email, get_email, list_emails, update_email};
use ops::{health_check, test_connect};

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/emails", get(list_emails).post(create_email))
        .route(
            "/emails/{id}",
            get(get_email).put(update_email).delete(delete_email),
        )
        .route("/export", get(export::export_emails))
        .route("/test-connect", get(test_connect))
        .with_state(app_state)
        .route("/health", get(health_check))
        // Both have to come after every route so they cover all of them.
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
}

async fn route_not_found(uri: Uri) -> Error {
    Error::RouteNotFound(uri.path().to_string())
}

async fn method_not_allowed(method: Method, uri: Uri) -> Error {
    Error::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
