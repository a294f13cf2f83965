//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, deadline)
//!     → /healthz            → "OK"
//!     → {actions_mount}/…   → actions.rs (JSON actions)
//!     → everything else     → ui.rs (HTML document or ?river-json=1)
//!     → response.rs (build id, cache policy, security headers)
//!     → Send to client
//! ```

pub mod actions;
pub mod request;
pub mod response;
pub mod server;
pub mod ui;

pub use request::X_REQUEST_ID;
pub use response::BUILD_ID_HEADER;
pub use server::{AppState, HttpServer};
