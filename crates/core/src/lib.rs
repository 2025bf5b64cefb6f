//! Mindful Ledger Core - Shared types library.
//!
//! This crate provides what both the client library and the CLI need:
//! - type-safe IDs, emails, money and the API's enumerations
//! - the records the API returns
//! - form state and client-side validation
//! - dashboard figures derived from fetched lists
//!
//! # Architecture
//!
//! The core crate performs no I/O: no HTTP, no filesystem, no clock. This
//! keeps validation and derivations testable without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails and money, plus wire enums
//! - [`models`] - Records returned by the API
//! - [`forms`] - Per-form field enums, validation and request bodies
//! - [`dashboard`] - Totals, monthly series and previews

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod forms;
pub mod models;
pub mod types;

pub use types::*;
