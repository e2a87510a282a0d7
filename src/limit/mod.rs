//! Rate limiting subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (client identifier)
//!     → limiter.rs (compute window, form key, check count)
//!     → store.rs (GET / atomic INCR+EXPIRE round trip)
//!     → Return: Admit or Reject
//! ```
//!
//! # Design Decisions
//! - The counting store is the only mutable shared state; contention is
//!   centralized there rather than locked in-process
//! - Store backend is pluggable (Redis in production, memory in tests)
//! - Store faults follow the configured failure policy (open by default)

pub mod limiter;
pub mod store;

pub use limiter::{FixedWindowLimiter, RateLimitDecision};
pub use store::{CounterStore, MemoryCounterStore, RedisCounterStore, StoreError};
