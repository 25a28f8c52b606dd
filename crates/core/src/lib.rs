//! Feirinha Core - Shared types library.
//!
//! This crate provides common types used across all Feirinha components:
//! - `app` - Application library and JSON API server
//! - `cli` - Command-line client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The
//! platform clients and store adapters live in the `app` crate; this
//! crate is the vocabulary they share.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   photo sets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
