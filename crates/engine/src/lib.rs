//! `censaudit-engine` — employee census comparison engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns classified results.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod align;
pub mod classify;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod model;
pub mod normalize;

pub use config::AuditConfig;
pub use engine::run;
pub use error::AuditError;
pub use model::{AuditInput, AuditResult, ComparisonRow, Status, Table};
