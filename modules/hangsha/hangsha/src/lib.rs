#![allow(clippy::must_use_candidate)]

//! Hangsha module.
//!
//! Backend for a student events and timetable app:
//!
//! - memos with user-owned tags
//! - timetables with custom enrolls and weekly time slots
//! - profile, interest categories and excluded keywords
//! - import of crawled program events
//!
//! ## Layers
//!
//! ```text
//!   api::rest      axum router, DTOs, problem responses, caller identity
//!        │
//!        ▼
//!   domain         PATCH decoding, collection sync, slot conflicts, services
//!        │
//!        ▼
//!   infra::storage SeaORM entities, repositories, migrations
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use api::rest::routes::{router, ApiDoc};
pub use config::ServiceConfig;
pub use domain::error::DomainError;
pub use domain::service::Service;
pub use infra::storage::migrations::Migrator;
