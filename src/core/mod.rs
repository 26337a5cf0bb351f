//! Core module - fundamental types and utilities

pub mod auth;
pub mod config;
pub mod project;
pub mod store;

pub use auth::{Authenticator, OpenAccess, StaticCredentials};
pub use config::Config;
pub use project::{Project, ProjectError};
pub use store::{Record, RecordStore, SqliteStore, StoreError};
