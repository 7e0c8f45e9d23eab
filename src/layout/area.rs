use std::fmt;
use std::ops::Range;

use crate::error::GridError;

use super::item::GridItem;

/// Declarative grid area: 1-based, end-exclusive CSS grid lines.
///
/// Rendered as `"row_start / col_start / row_end / col_end"`, the exact
/// string handed to `grid-area` by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridArea {
    pub row_start: u32,
    pub col_start: u32,
    pub row_end: u32,
    pub col_end: u32,
}

impl GridArea {
    pub const fn new(row_start: u32, col_start: u32, row_end: u32, col_end: u32) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    /// Area covering a positional item. Zero extents are clamped to one track.
    pub fn from_item(item: &GridItem) -> Self {
        let w = item.w.max(1);
        let h = item.h.max(1);
        Self::new(
            item.y.saturating_add(1),
            item.x.saturating_add(1),
            item.y.saturating_add(h).saturating_add(1),
            item.x.saturating_add(w).saturating_add(1),
        )
    }

    /// Parse area number `index` (used only for error reporting).
    pub fn parse(index: usize, raw: &str) -> Result<Self, GridError> {
        let invalid = |reason| GridError::InvalidArea {
            index,
            area: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid("expected four `/`-separated grid lines"));
        }

        let mut lines = [0u32; 4];
        for (slot, part) in lines.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("grid lines must be positive integers"));
            }
            *slot = part
                .parse()
                .map_err(|_| invalid("grid line out of range"))?;
            if *slot == 0 {
                return Err(invalid("grid lines are 1-based"));
            }
        }

        let [row_start, col_start, row_end, col_end] = lines;
        if row_end <= row_start || col_end <= col_start {
            return Err(invalid("end line must follow start line"));
        }

        Ok(Self::new(row_start, col_start, row_end, col_end))
    }

    /// Zero-based column tracks covered by this area. A zero line is
    /// read as line 1.
    pub fn col_tracks(&self) -> Range<usize> {
        track_range(self.col_start, self.col_end)
    }

    /// Zero-based row tracks covered by this area.
    pub fn row_tracks(&self) -> Range<usize> {
        track_range(self.row_start, self.row_end)
    }
}

fn track_range(start_line: u32, end_line: u32) -> Range<usize> {
    start_line.saturating_sub(1) as usize..end_line.saturating_sub(1) as usize
}

impl fmt::Display for GridArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.row_start, self.col_start, self.row_end, self.col_end
        )
    }
}
