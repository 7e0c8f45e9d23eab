use std::fmt;

use thiserror::Error;

/// Unified result type for the Cavvy grid crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Grid axis a track string or area line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Columns,
    Rows,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Columns => f.write_str("columns"),
            Axis::Rows => f.write_str("rows"),
        }
    }
}

/// Failures while reading the declarative (CSS) form of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("repeat() is not supported in {axis} tracks")]
    UnsupportedRepeat { axis: Axis },
    #[error("invalid {axis} track `{token}`")]
    InvalidTrack { axis: Axis, token: String },
    #[error("{axis} tracks span {units} units, more than the {max} allowed")]
    GridTooLarge { axis: Axis, units: u32, max: u32 },
    #[error("invalid grid area #{index} `{area}`: {reason}")]
    InvalidArea {
        index: usize,
        area: String,
        reason: &'static str,
    },
    #[error("grid area #{index} reaches {axis} line {line} but only {tracks} tracks are defined")]
    AreaOutOfBounds {
        index: usize,
        axis: Axis,
        line: u32,
        tracks: usize,
    },
}

/// Errors surfaced by the layout editor and canvas records.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("layout has {areas} areas but canvas has {sections} sections")]
    SectionMismatch { areas: usize, sections: usize },
    #[error("area index {index} out of range ({len} areas)")]
    AreaIndex { index: usize, len: usize },
    #[error("grid item `{0}` does not belong to this canvas")]
    UnknownItem(String),
    #[error("grid item `{0}` appears more than once in a layout update")]
    DuplicateItem(String),
    #[error("invalid editor config: {0}")]
    Config(&'static str),
    #[error("log sink error: {0}")]
    Logging(#[from] crate::logging::LoggingError),
    #[error("invalid canvas record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
