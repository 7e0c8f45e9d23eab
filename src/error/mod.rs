//! Error module orchestrator.
//!
//! Parse-level failures live in [`GridError`]; everything the editor and the
//! canvas records can surface is folded into [`LayoutError`].

mod types;

pub use types::{Axis, GridError, LayoutError, Result};
