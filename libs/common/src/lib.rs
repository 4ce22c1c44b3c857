//! Shared infrastructure for the product catalog service
//!
//! This crate provides the pieces every binary needs regardless of what it
//! serves: database configuration, connection pooling, and the database
//! error types.

pub mod database;
pub mod error;
