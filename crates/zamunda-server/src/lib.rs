//! zamunda-server library
//!
//! Exposes the router and configuration so integration tests can run
//! the server in-process; the binary in `main.rs` is a thin wrapper.

pub mod api;
pub mod config;
