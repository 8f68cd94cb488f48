//! Core library for `VAmPI`.
//!
//! Resolves the runtime configuration from the environment, defines the
//! baseline seed data, and drives the bootstrap sequence that brings a
//! store to a schema-complete, seeded state. This crate depends on
//! `vampi-storage` for the store capability and knows nothing about HTTP.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod info;
pub mod seed;
