use pcb_common::geom::coord::GridCoord;

/// Dense square lattice of routing cells. Only occupancy lives here; the
/// per-search cost and predecessor state belongs to the A* solver so one
/// grid can serve many pathfinding calls without stale-state leaks.
pub struct Grid {
    dims: u32,
    occupied: Vec<bool>,
}

impl Grid {
    pub fn new(dims: u32, obstructions: impl IntoIterator<Item = GridCoord>) -> Self {
        let mut grid = Self {
            dims,
            occupied: vec![false; (dims as usize) * (dims as usize)],
        };
        for cell in obstructions {
            grid.set_obstacle(cell);
        }
        grid
    }

    #[inline(always)]
    fn index(&self, c: GridCoord) -> usize {
        (c.y as usize) * (self.dims as usize) + (c.x as usize)
    }

    pub fn dims(&self) -> u32 {
        self.dims
    }

    pub fn in_bounds(&self, c: GridCoord) -> bool {
        c.x < self.dims && c.y < self.dims
    }

    /// Occupancy of the cell, or None out of bounds.
    pub fn cell_at(&self, c: GridCoord) -> Option<bool> {
        if self.in_bounds(c) {
            Some(self.occupied[self.index(c)])
        } else {
            None
        }
    }

    /// Out-of-bounds mutation is a caller contract violation and panics.
    pub fn set_obstacle(&mut self, c: GridCoord) {
        let idx = self.index(c);
        self.occupied[idx] = true;
    }

    pub fn clear_obstacle(&mut self, c: GridCoord) {
        let idx = self.index(c);
        self.occupied[idx] = false;
    }

    pub fn is_obstacle(&self, c: GridCoord) -> bool {
        if !self.in_bounds(c) {
            return true;
        }
        self.occupied[self.index(c)]
    }

    /// The up-to-4 orthogonally adjacent in-bounds coordinates. Diagonal
    /// adjacency is never offered.
    pub fn neighbors(&self, c: GridCoord) -> impl Iterator<Item = GridCoord> + use<> {
        let mut out = [GridCoord::new(0, 0); 4];
        let mut count = 0;
        if c.x > 0 {
            out[count] = GridCoord::new(c.x - 1, c.y);
            count += 1;
        }
        if c.x < self.dims - 1 {
            out[count] = GridCoord::new(c.x + 1, c.y);
            count += 1;
        }
        if c.y > 0 {
            out[count] = GridCoord::new(c.x, c.y - 1);
            count += 1;
        }
        if c.y < self.dims - 1 {
            out[count] = GridCoord::new(c.x, c.y + 1);
            count += 1;
        }
        out.into_iter().take(count)
    }
}
