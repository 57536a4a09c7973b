//! Join engine for semlens bundles.
//!
//! A [`JoinDefinition`](semlens_model::JoinDefinition) names two bundles and
//! a list of role-to-role conditions. The engine resolves each role through
//! its bundle's mappings, then runs a nested-loop scan for the requested join
//! type. Resolution failures abort the join before any row is read.

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod predicate;
pub mod resolve;
pub mod result;
pub mod validate;

pub use engine::execute_join;
pub use error::{JoinError, JoinSide, Result, UnresolvedColumn, UnresolvedReason};
pub use predicate::compare;
pub use resolve::{ResolvedCondition, resolve_conditions, resolve_role};
pub use result::{JoinResult, JoinStats, JoinedRow};
pub use validate::{JoinValidation, validate_join};
