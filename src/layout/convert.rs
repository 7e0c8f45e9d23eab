//! Conversion between the declarative CSS form and the positional form.
//!
//! `css_to_grid_items` reads persisted `areas` + track strings into
//! [`GridItem`]s; `grid_items_to_css` writes them back. The trip is
//! geometry-preserving only: serialization always emits uniform `1fr`
//! columns and `auto` rows, so explicit track weights are discarded.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, GridError};

use super::area::GridArea;
use super::item::{GridItem, normalize_origin};
use super::tracks::{TrackList, TrackSize, parse_tracks};

/// Declarative output of [`grid_items_to_css`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssGrid {
    pub areas: Vec<String>,
    pub cols: String,
    pub rows: String,
}

impl CssGrid {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Parse back into positional items.
    pub fn to_items(&self) -> Result<Vec<GridItem>, GridError> {
        css_to_grid_items(&self.areas, &self.cols, &self.rows)
    }
}

/// Parse persisted areas and track strings into positional items.
///
/// Item `i` gets id `i.to_string()`; the output has one item per area, in
/// area order. Rows are checked first so a `repeat(...)` row template is
/// reported before anything else.
pub fn css_to_grid_items<S: AsRef<str>>(
    areas: &[S],
    columns: &str,
    rows: &str,
) -> Result<Vec<GridItem>, GridError> {
    let rows = parse_tracks(Axis::Rows, rows)?;
    let columns = parse_tracks(Axis::Columns, columns)?;

    areas
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let area = GridArea::parse(index, raw.as_ref())?;
            place_area(index, &area, &columns, &rows)
        })
        .collect()
}

fn place_area(
    index: usize,
    area: &GridArea,
    columns: &TrackList,
    rows: &TrackList,
) -> Result<GridItem, GridError> {
    check_bounds(index, Axis::Columns, area.col_end, columns)?;
    check_bounds(index, Axis::Rows, area.row_end, rows)?;

    let cols = area.col_tracks();
    let row_span = area.row_tracks();

    Ok(GridItem {
        id: index.to_string(),
        x: columns.span_units(0..cols.start),
        y: rows.span_units(0..row_span.start),
        w: columns.span_units(cols),
        h: rows.span_units(row_span),
    })
}

fn check_bounds(index: usize, axis: Axis, end_line: u32, tracks: &TrackList) -> Result<(), GridError> {
    // Line n closes track n - 1, so the last legal end line is len + 1.
    if end_line.saturating_sub(1) as usize > tracks.len() {
        return Err(GridError::AreaOutOfBounds {
            index,
            axis,
            line: end_line,
            tracks: tracks.len(),
        });
    }
    Ok(())
}

/// Serialize positional items back into areas and uniform track strings.
///
/// Items are translated so the bounding box starts at the origin, clamped
/// to `w, h >= 1` and kept inside the `MAX_GRID_UNITS` square, so the output
/// always parses back. Area order follows input order.
pub fn grid_items_to_css(items: &[GridItem]) -> CssGrid {
    if items.is_empty() {
        return CssGrid::default();
    }

    let normalized = normalize_origin(items);
    let max_x = normalized.iter().map(GridItem::right).max().unwrap_or(0);
    let max_y = normalized.iter().map(GridItem::bottom).max().unwrap_or(0);

    CssGrid {
        areas: normalized
            .iter()
            .map(|item| GridArea::from_item(item).to_string())
            .collect(),
        cols: TrackList::uniform(max_x as usize, TrackSize::fr(1)).to_string(),
        rows: TrackList::uniform(max_y as usize, TrackSize::Auto).to_string(),
    }
}
