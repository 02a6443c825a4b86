//! Asset proxy library.
//!
//! Serves `GET /assets/{*path}` by fetching from either the raw asset store
//! or, when `type=image` is requested, the image resizer, and relaying the
//! result with a fixed cache and CORS policy.
//!
//! ```text
//!     Client Request                         ┌──────────────┐
//!     ──────────▶ http::server ─▶ routing ─▶ │   upstream   │ ─▶ asset store
//!                 (decode path)   (resolve)  │    client    │ ─▶ resizer
//!     Client Response                        └──────┬───────┘
//!     ◀────────── http::response ◀──────────────────┘
//!                 (headers + streamed body)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
