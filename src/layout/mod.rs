//! Layout module orchestrator.
//!
//! Downstream code imports the conversion pair and the record types from
//! here; parsing details live in the submodules.

pub mod area;
pub mod convert;
pub mod item;
pub mod tracks;

pub use area::GridArea;
pub use convert::{CssGrid, css_to_grid_items, grid_items_to_css};
pub use item::{GridItem, bottom_edge, normalize_origin};
pub use tracks::{MAX_GRID_UNITS, TrackList, TrackSize, parse_tracks};
