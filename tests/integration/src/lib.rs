//! Integration test utilities for the dashboard layer
//!
//! This crate provides helpers for running end-to-end scenarios against an
//! in-memory record store: seeding records, opening role dashboards and
//! driving mutations through the services.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
