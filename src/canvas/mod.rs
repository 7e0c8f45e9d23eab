//! Persisted canvas records.
//!
//! The document store owns these shapes; this crate only reads and writes
//! them as JSON and keeps their areas aligned with the section list.

mod core;

pub use core::{CanvasLayout, CanvasSection, CanvasType, GridTemplate};
