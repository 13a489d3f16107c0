//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Discovery failure:
//!     → consecutive failure count
//!     → backoff.rs (exponential delay, capped below the tick interval)
//!     → retry on the next tick
//! ```
//!
//! # Design Decisions
//! - Every network call has a deadline (see discovery)
//! - Retries are unbounded in count but bounded in delay
//! - Backoff delays are jittered

pub mod backoff;

pub use backoff::calculate_backoff;
