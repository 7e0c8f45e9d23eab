use serde::{Deserialize, Serialize};

use super::tracks::MAX_GRID_UNITS;

/// Positional form of a grid area, measured in track units.
///
/// `x`/`y` are zero-based column/row starts and `w`/`h` the spanned column
/// and row counts. This is the shape the drag/resize widget reads and emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridItem {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridItem {
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Re-assert the `w, h >= 1` invariant. Resize handles can emit zero.
    pub fn clamped(mut self) -> Self {
        self.w = self.w.max(1);
        self.h = self.h.max(1);
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

/// Translate `items` so their bounding box starts at `(0, 0)`, clamping
/// every width and height to at least one track. Order is preserved.
///
/// Items are also pulled inside a [`MAX_GRID_UNITS`] square: starts move
/// back to the last track and extents are cut at the far edge.
pub fn normalize_origin(items: &[GridItem]) -> Vec<GridItem> {
    let min_x = items.iter().map(|item| item.x).min().unwrap_or(0);
    let min_y = items.iter().map(|item| item.y).min().unwrap_or(0);

    items
        .iter()
        .map(|item| {
            let (x, w) = fit_axis(item.x - min_x, item.w);
            let (y, h) = fit_axis(item.y - min_y, item.h);
            GridItem {
                id: item.id.clone(),
                x,
                y,
                w,
                h,
            }
        })
        .collect()
}

fn fit_axis(start: u32, extent: u32) -> (u32, u32) {
    let start = start.min(MAX_GRID_UNITS - 1);
    let extent = extent.clamp(1, MAX_GRID_UNITS - start);
    (start, extent)
}

/// Lowest occupied row edge, i.e. where an appended item lands.
pub fn bottom_edge<'a>(items: impl IntoIterator<Item = &'a GridItem>) -> u32 {
    items.into_iter().map(GridItem::bottom).max().unwrap_or(0)
}
