//! Project catalog for semlens.
//!
//! A [`Project`] holds every schema, bundle, join and virtual bundle a user
//! works with, and persists them as one JSON file.
//!
//! # Architecture
//!
//! - `catalog.rs` - [`Catalog`] lookup trait
//! - `ops.rs` - join execution, materialization, views and lineage over any catalog
//! - `cache.rs` - [`JoinCache`] for virtual bundle materialization
//! - `project.rs` - the in-memory [`Project`] and its edit operations
//! - `io/` - atomic save and versioned load
//! - `error.rs` - error types with user-friendly messages

#![deny(unsafe_code)]

mod cache;
mod catalog;
mod error;
mod io;
mod ops;
mod project;

pub use cache::JoinCache;
pub use catalog::Catalog;
pub use error::{ProjectError, Result};
pub use io::{load_project, parse_project, save_project};
pub use ops::{execute_join, lineage, materialize_virtual_bundle, view, view_virtual_bundle};
pub use project::{CURRENT_PROJECT_VERSION, DeletionImpact, Project, ReloadReport};
