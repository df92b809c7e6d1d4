use tower_http::cors::{Any, CorsLayer};

/// The API is called from a separately served single-page client.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
