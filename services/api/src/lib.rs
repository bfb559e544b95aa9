//! Learning Path API Library Crate
//!
//! This library contains the HTTP surface of the learning path service: the
//! configuration, application state, API handlers and routing. The binaries
//! under `bin/` are thin wrappers around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
