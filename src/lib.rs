//! Taskboard: a small task tracker with per-task comments.
//!
//! The crate is split into layers:
//!
//! - [`domain`]: tasks, comments and their identifiers
//! - [`infrastructure`]: the snapshot store, the repository and configuration
//! - [`api`]: the axum REST surface under `/api`
//! - [`server`]: listener bootstrap and graceful shutdown
//! - [`client`]: an HTTP client and the dashboard view model built on it

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod server;
