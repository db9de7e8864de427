//! Map coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Coord,
    /// Width in tiles.
    pub w: u16,
    /// Height in tiles.
    pub h: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(origin: Coord, w: u16, h: u16) -> Self {
        Self { origin, w, h }
    }

    /// Whether `coord` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        let x = u32::from(coord.x);
        let y = u32::from(coord.y);
        let x0 = u32::from(self.origin.x);
        let y0 = u32::from(self.origin.y);
        x >= x0 && x < x0 + u32::from(self.w) && y >= y0 && y < y0 + u32::from(self.h)
    }

    /// All coordinates in row-major order. Tiles past `u16::MAX` are skipped.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let Self { origin, w, h } = *self;
        (0..h).flat_map(move |dy| {
            (0..w).filter_map(move |dx| {
                let x = origin.x.checked_add(dx)?;
                let y = origin.y.checked_add(dy)?;
                Some(Coord::new(x, y))
            })
        })
    }
}
