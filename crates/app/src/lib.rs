//! Feirinha application library.
//!
//! This crate provides the classifieds application as a library,
//! allowing it to be tested and reused by the server binary and the
//! command-line client.
//!
//! # Architecture
//!
//! The platform (Firebase) is the source of truth for everything:
//! accounts live in the Identity Toolkit, listings and profiles live
//! in Firestore. This crate holds no local database - only typed
//! clients, store adapters, and the services that compose them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod platform;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod token_cache;
