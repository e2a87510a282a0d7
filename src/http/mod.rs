//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, pipeline composition)
//!     → rate limiter (admit or 429)
//!     → timing.rs (measure, log, X-Process-Time)
//!     → routing + proxy (dispatch and forward)
//!     → Send to client
//! ```

pub mod request_id;
pub mod server;
pub mod timing;

pub use request_id::{MakeGatewayRequestId, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
pub use timing::X_PROCESS_TIME;
