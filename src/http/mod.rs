//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /assets/{*path}?type=&w=&h=
//!     → server.rs (Axum setup, middleware, handler)
//!     → request.rs (request ID, path decode, resize params)
//!     → [routing resolves upstream URL]
//!     → [upstream client fetches]
//!     → response.rs (header policy, streamed body)
//!     → error.rs (400/500 JSON on early exit)
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ErrorKind, ProxyError};
pub use request::{AssetPath, UuidRequestId, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
