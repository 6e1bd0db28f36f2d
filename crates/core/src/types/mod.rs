//! Core types for Furnspace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order_code;
pub mod status;
pub mod variant;

pub use email::{Email, EmailError};
pub use id::*;
pub use order_code::{OrderCode, OrderCodeError};
pub use status::*;
pub use variant::{Variant, VariantOption};
