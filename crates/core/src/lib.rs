//! Furnspace Core - Shared types library.
//!
//! This crate provides common types used across all Furnspace components:
//! - `storefront` - Customer-facing shop API
//! - `admin` - Back-office API for catalog, customer, and order management
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, order codes, and
//!   the status enums that gate order lifecycle transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
