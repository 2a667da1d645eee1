//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired keys from the in-process cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
