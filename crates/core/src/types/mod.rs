//! Core types for Storage Hub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;
pub mod zone;

pub use id::*;
pub use price::Price;
pub use status::*;
pub use zone::*;
