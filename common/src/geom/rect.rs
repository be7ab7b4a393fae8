use super::coord::GridCoord;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in grid coordinates, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl GridRect {
    pub fn new(min: GridCoord, max: GridCoord) -> Self {
        Self { min, max }
    }

    /// Smallest rect covering every coordinate in the iterator, or None
    /// when the iterator is empty.
    pub fn covering<I: IntoIterator<Item = GridCoord>>(cells: I) -> Option<Self> {
        let mut it = cells.into_iter();
        let first = it.next()?;
        let mut rect = GridRect::new(first, first);
        for c in it {
            rect.min.x = rect.min.x.min(c.x);
            rect.min.y = rect.min.y.min(c.y);
            rect.max.x = rect.max.x.max(c.x);
            rect.max.y = rect.max.y.max(c.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> u32 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> u32 {
        self.max.y - self.min.y
    }
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }
}
