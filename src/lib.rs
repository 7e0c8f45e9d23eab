//! Grid layout core for Cavvy canvas documents.
//!
//! Canvas sections are placed on a CSS grid. Persisted layouts use the
//! declarative form (`grid-area` strings plus `columns`/`rows` track
//! strings); the drag/resize editor works on positional `GridItem`s. This
//! crate converts between the two and runs the editing session that keeps
//! sections and areas in step.

pub mod canvas;
pub mod editor;
pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;

pub use canvas::{CanvasLayout, CanvasSection, CanvasType, GridTemplate};
pub use editor::{EditorConfig, LayoutEditor, LayoutObserver, NullLayoutObserver, SectionSlot};
pub use error::{Axis, GridError, LayoutError, Result};
pub use layout::{
    CssGrid, GridArea, GridItem, MAX_GRID_UNITS, TrackList, TrackSize, css_to_grid_items,
    grid_items_to_css, normalize_origin,
};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{EditorMetrics, MetricSnapshot};
