//! Layout-editing session.
//!
//! Owns the positional state for one canvas while it is being edited and
//! re-derives the declarative layout after every mutation.

mod config;
mod core;

pub use config::EditorConfig;
pub use core::{LayoutEditor, LayoutObserver, NullLayoutObserver, SectionSlot};
