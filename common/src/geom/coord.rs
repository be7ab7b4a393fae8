use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn manhattan(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Applies a unit orthogonal offset, returning None when the result
    /// would leave the `dims x dims` square.
    pub fn offset(self, dx: i32, dy: i32, dims: u32) -> Option<GridCoord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x >= dims || y >= dims {
            return None;
        }
        Some(GridCoord::new(x, y))
    }

    pub fn translate(self, dx: u32, dy: u32) -> GridCoord {
        GridCoord::new(self.x + dx, self.y + dy)
    }
}
