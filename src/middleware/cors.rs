use tower_http::cors::{Any, CorsLayer};

/// The dashboards are served from another origin and call the API with a
/// bearer header, so any origin, method and header is accepted.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
