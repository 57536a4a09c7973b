//! CLI library components for semlens.

pub mod logging;
pub mod render;
