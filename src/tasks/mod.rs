//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes expired cache entries and rate-limit windows

mod cleanup;

pub use cleanup::spawn_cleanup_task;
