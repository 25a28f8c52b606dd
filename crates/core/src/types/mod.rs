//! Core types for Feirinha.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod photos;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use photos::PhotoSet;
pub use price::{Price, PriceError};
