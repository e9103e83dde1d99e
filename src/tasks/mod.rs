//! Background Tasks Module
//!
//! Tasks that run for the lifetime of the gateway.
//!
//! # Tasks
//! - Cache cleanup: sweeps expired responses at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
