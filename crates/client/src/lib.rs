//! Mindful Ledger Client - everything that talks to the API.
//!
//! - [`api`] - one method per REST endpoint, envelope handling
//! - [`session`] - login state restored from and persisted to [`storage`]
//! - [`guard`] - which routes a session may open
//! - [`pages`] - per-screen controllers: lists, forms, field errors, banners
//! - [`fetch`] - a cancellable background GET
//!
//! Front-ends (the `mledger` CLI, or any other) build a [`ClientConfig`],
//! an [`ApiClient`] and a [`Session`] once at startup, bootstrap the
//! session, and hand it to the pages.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod pages;
pub mod session;
pub mod storage;

pub use api::{ApiClient, TransactionFilters};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use fetch::{Fetch, FetchState};
pub use guard::{Navigation, Route};
pub use session::{Session, SessionError, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageKey};
