//! Core types for Mindful Ledger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod enums;
pub mod id;
pub mod money;

pub use email::{Email, EmailError};
pub use enums::*;
pub use id::*;
pub use money::Money;
