//! The relay is called from browser code served on a different origin, so
//! every response carries permissive CORS headers.

use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-client-info"),
                HeaderName::from_static("apikey"),
            ]),
    )
}
