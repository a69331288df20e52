//! Cross-origin policy: a fixed allow-list of origins.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Origins allowed to read responses from a browser script.
pub const ALLOWED_ORIGINS: [&str; 8] = [
    "http://localhost:3000",
    "https://localhost:3000",
    "http://theforumuniversity.com",
    "https://theforumuniversity.com",
    "http://www.theforumuniversity.com",
    "https://www.theforumuniversity.com",
    "http://api.theforumuniversity.com",
    "https://api.theforumuniversity.com",
];

/// Requests from origins not in `ALLOWED_ORIGINS` get no CORS headers.
pub fn cors_layer() -> CorsLayer {
    let origins = ALLOWED_ORIGINS.map(HeaderValue::from_static);

    // Credentials can't be combined with wildcards, so methods and headers are mirrored instead.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
