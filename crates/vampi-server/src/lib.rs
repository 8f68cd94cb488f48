//! `VAmPI` HTTP server.
//!
//! Wires the bootstrap core and a store backend into an Axum router that
//! serves the info, diagnostic, and database seeding endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
