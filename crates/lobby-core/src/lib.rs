//! Core types and trait definitions for the Lobby visitor-kiosk system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//! The one allowance is `tokio::sync`, because live-query subscriptions
//! are expressed as [`tokio::sync::watch`] receivers.

pub mod auth;
pub mod employee;
pub mod error;
pub mod notify;
pub mod prereg;
pub mod store;
pub mod visit;

pub use error::ValidationError;
