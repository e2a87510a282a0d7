//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → dispatcher.rs (split first segment from remainder)
//!     → registry.rs (name → base URL lookup)
//!     → Return: DispatchTarget or ServiceNotFound
//!
//! Registry construction (at startup):
//!     config services map
//!     → normalize base URLs
//!     → freeze as immutable ServiceRegistry
//! ```
//!
//! # Design Decisions
//! - Registry compiled at startup, immutable at runtime
//! - Dispatch is pure string work; deterministic
//! - Explicit ServiceNotFound rather than silent pass-through

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{route, split_path, DispatchTarget};
pub use registry::ServiceRegistry;
