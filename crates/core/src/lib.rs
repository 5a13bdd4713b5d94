//! Shopdeck Core - Shared types library.
//!
//! This crate provides common types used across all Shopdeck components:
//! - `admin` - Store admin HTTP API
//! - `client` - API client and the mutation/retry protocol
//! - `cli` - Command-line forms, migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used on both
//! sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, colors, entity models and request payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
