//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the asset handler
//! - Wire up middleware (tracing, request ID, panic recovery)
//! - Bind server to listener
//! - Translate requests into upstream fetches and relay the result
//! - Graceful shutdown with a bounded drain window

use std::any::Any;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::error::{error_response, ProxyError};
use crate::http::request::{self, AssetPath, UuidRequestId, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{media_type_for, UpstreamResolver};
use crate::upstream::UpstreamClient;

/// Errors building the server from a validated config.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid resizer host: {0}")]
    Resizer(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<UpstreamResolver>,
    pub client: UpstreamClient,
}

/// HTTP server for the asset proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let resolver = Arc::new(UpstreamResolver::from_config(&config.upstreams)?);
        let client = UpstreamClient::new(&config.upstreams, &config.timeouts)?;

        let state = AppState { resolver, client };
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/assets", get(assets_handler))
            .route("/assets/", get(assets_handler))
            .route("/assets/{*path}", get(assets_handler))
            .with_state(state)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(&X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until `shutdown` fires, then drain for at most the
    /// configured grace period.
    ///
    /// A closed shutdown channel is treated the same as a signal.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let grace = self.config.timeouts.shutdown_grace();
        tracing::info!(address = %addr, "HTTP server starting");

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!(
                grace_secs = grace.as_secs(),
                "Shutdown requested, draining in-flight requests"
            );
            let _ = draining_tx.send(());
        };

        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => result?,
            Ok(()) = draining_rx => {
                match tokio::time::timeout(grace, &mut server).await {
                    Ok(result) => result?,
                    Err(_) => tracing::warn!(
                        grace_secs = grace.as_secs(),
                        "Grace period elapsed, closing remaining connections"
                    ),
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// `GET /assets/{*path}`: resolve, fetch and relay one asset.
async fn assets_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start_time = Instant::now();

    let path = match AssetPath::from_uri(&uri) {
        Ok(path) => path,
        Err(e) => {
            metrics::record_request(e.status().as_u16(), "none", start_time);
            return e.into_response();
        }
    };

    let resize = request::resize_spec(uri.query());
    let media_type = media_type_for(path.as_str());
    let target = state.resolver.resolve(path.as_str(), resize.as_ref());

    tracing::debug!(
        path = %path,
        upstream = %target,
        kind = %target.kind,
        "Fetching asset"
    );

    match state.client.fetch(target.as_str()).await {
        Ok(upstream) => {
            metrics::record_request(StatusCode::OK.as_u16(), target.kind.as_str(), start_time);
            response::relay(upstream, media_type)
        }
        Err(e) => {
            tracing::warn!(upstream = %target, error = %e, "Upstream fetch failed");
            metrics::record_upstream_error(e.reason());
            let err = ProxyError::from(e);
            metrics::record_request(err.status().as_u16(), target.kind.as_str(), start_time);
            err.into_response()
        }
    }
}

/// Convert a handler panic into a 500 JSON error.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tower::ServiceExt;

    fn test_server() -> HttpServer {
        let mut config = ProxyConfig::default();
        config.upstreams.assets_api_host = "http://127.0.0.1:9".into();
        config.upstreams.resizer_api_host = "http://127.0.0.1:9".into();
        config.upstreams.system_proxy = false;
        HttpServer::new(config).unwrap()
    }

    async fn call(uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        test_server().router.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_path_is_bad_request() {
        for uri in ["/assets", "/assets/", "/assets/%20%20/"] {
            let response = call(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], br#"{"error":"path is required"}"#);
        }
    }

    #[tokio::test]
    async fn test_malformed_path_is_bad_request() {
        let response = call("/assets/%zz").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"invalid path"}"#);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = call("/assets/").await;
        assert!(response.headers().contains_key(&X_REQUEST_ID));

        let request = Request::builder()
            .uri("/assets/")
            .header(&X_REQUEST_ID, "caller-supplied")
            .body(Body::empty())
            .unwrap();
        let response = test_server().router.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[&X_REQUEST_ID], "caller-supplied");
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/assets/photo.jpg")
            .body(Body::empty())
            .unwrap();
        let response = test_server().router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = call("/other/photo.jpg").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let router: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"internal server error"}"#);
    }
}
