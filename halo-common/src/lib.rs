//! # Halo Common Library
//!
//! Shared code for the Halo reading tracker including:
//! - Book catalog and canonical chapter order
//! - Verse boundary parser
//! - Reading plan derivation
//! - Progress map (completed chapters per book)
//! - API request/response types
//! - Configuration loading

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod plan;
pub mod progress;
pub mod verses;

pub use catalog::{Book, Testament};
pub use error::{Error, Result};
pub use plan::PlanItem;
pub use progress::ProgressMap;
pub use verses::Verse;
