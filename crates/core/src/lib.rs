#![forbid(unsafe_code)]

//! Domain layer for the quiz runner.
//!
//! Everything here is pure: no I/O, no timers, no async. Services drive these
//! types and storage adapters persist the resulting summaries.

pub mod error;
pub mod model;
pub mod pagination;
pub mod schema;
pub mod search;
pub mod time;

pub use error::Error;
pub use time::Clock;
