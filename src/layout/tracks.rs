//! Track-size lists - the `columns` / `rows` half of a CSS grid template
//!
//! A track string is a space-separated list of `<N>fr`, `<N>px` or `auto`
//! tokens. For coordinate purposes every token collapses to a number of
//! abstract units:
//! - `<N>fr` and `<N>px` both count as `N`
//! - `auto` counts as exactly 1
//!
//! This is an approximation for the positional editor, not CSS track sizing.
//!
//! # Example
//! ```
//! use cavvy_grid::layout::tracks::{parse_tracks, TrackSize};
//! use cavvy_grid::Axis;
//!
//! let cols = parse_tracks(Axis::Columns, "1fr 2fr auto")?;
//! assert_eq!(cols.len(), 3);
//! assert_eq!(cols.units(), 4);
//! assert_eq!(cols.get(1), Some(TrackSize::fr(2)));
//! # Ok::<(), cavvy_grid::GridError>(())
//! ```

use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;

use crate::error::{Axis, GridError};

/// Largest coordinate space, in units per axis, a layout may span.
///
/// Parsed track lists summing past this are rejected, and the serializer
/// keeps every item inside it, so both directions stay within `u32` and
/// emit bounded track strings.
pub const MAX_GRID_UNITS: u32 = 4096;

/// Defines how a single column or row is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSize {
    /// Flexible share, CSS `fr`
    Fr(NonZeroU32),

    /// Absolute size, CSS `px`
    Px(NonZeroU32),

    /// Content sized, counted as one unit
    Auto,
}

impl TrackSize {
    /// Create Fr variant
    ///
    /// # Panics
    /// Panics if n is zero
    pub fn fr(n: u32) -> Self {
        Self::Fr(NonZeroU32::new(n).expect("fr track must be non-zero"))
    }

    /// Create Px variant
    ///
    /// # Panics
    /// Panics if n is zero
    pub fn px(n: u32) -> Self {
        Self::Px(NonZeroU32::new(n).expect("px track must be non-zero"))
    }

    /// Size of this track in coordinate units.
    pub fn units(self) -> u32 {
        match self {
            TrackSize::Fr(n) | TrackSize::Px(n) => n.get(),
            TrackSize::Auto => 1,
        }
    }

    /// Parse one token.
    ///
    /// Only positive base-10 integers are accepted in front of `fr`/`px`;
    /// `1.5fr`, `0px`, `-2fr` and bare numbers are rejected.
    pub fn parse(axis: Axis, token: &str) -> Result<Self, GridError> {
        if token == "auto" {
            return Ok(TrackSize::Auto);
        }

        let invalid = || GridError::InvalidTrack {
            axis,
            token: token.to_string(),
        };

        let (digits, ctor): (&str, fn(NonZeroU32) -> TrackSize) =
            if let Some(digits) = token.strip_suffix("fr") {
                (digits, TrackSize::Fr)
            } else if let Some(digits) = token.strip_suffix("px") {
                (digits, TrackSize::Px)
            } else {
                return Err(invalid());
            };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .map(ctor)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for TrackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSize::Fr(n) => write!(f, "{n}fr"),
            TrackSize::Px(n) => write!(f, "{n}px"),
            TrackSize::Auto => f.write_str("auto"),
        }
    }
}

/// Ordered track sizes for one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackList {
    tracks: Vec<TrackSize>,
}

impl TrackList {
    pub fn new(tracks: Vec<TrackSize>) -> Self {
        Self { tracks }
    }

    /// `count` copies of `track`.
    pub fn uniform(count: usize, track: TrackSize) -> Self {
        Self {
            tracks: vec![track; count],
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TrackSize> {
        self.tracks.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = TrackSize> + '_ {
        self.tracks.iter().copied()
    }

    /// Total units across every track.
    pub fn units(&self) -> u32 {
        self.span_units(0..self.tracks.len())
    }

    /// Units covered by the zero-based track range, clipped to the list.
    pub fn span_units(&self, range: Range<usize>) -> u32 {
        let end = range.end.min(self.tracks.len());
        let start = range.start.min(end);
        self.tracks[start..end]
            .iter()
            .fold(0u32, |acc, track| acc.saturating_add(track.units()))
    }
}

impl fmt::Display for TrackList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, track) in self.tracks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{track}")?;
        }
        Ok(())
    }
}

/// Parse a whole track string such as `"1fr 2fr auto"`.
///
/// `repeat(...)` is rejected outright. An empty string yields an empty list.
/// Lists spanning more than [`MAX_GRID_UNITS`] units are rejected.
pub fn parse_tracks(axis: Axis, input: &str) -> Result<TrackList, GridError> {
    if input.contains("repeat") {
        return Err(GridError::UnsupportedRepeat { axis });
    }

    let tracks = input
        .split_whitespace()
        .map(|token| TrackSize::parse(axis, token))
        .collect::<Result<Vec<_>, _>>()
        .map(TrackList::new)?;

    let units = tracks.units();
    if units > MAX_GRID_UNITS {
        return Err(GridError::GridTooLarge {
            axis,
            units,
            max: MAX_GRID_UNITS,
        });
    }
    Ok(tracks)
}
