use crate::grid::Grid;
use pcb_common::geom::coord::GridCoord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f_score: u32,
    g_score: u32,
    index: u32,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on f; equal f prefers the larger g (smaller heuristic),
        // which biases expansion toward the goal.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable A* solver. Search state lives in coordinate-indexed arenas
/// cleared by an epoch tag per call, so one solver serves many nets with
/// no allocation churn and no stale state between calls.
#[derive(Clone)]
pub struct AStar {
    parents: Vec<u32>,
    g_score: Vec<u32>,
    visited_tag: Vec<u32>,
    current_tag: u32,
    capacity: usize,
}

impl AStar {
    pub fn new() -> Self {
        let cap = 4096;
        Self {
            parents: vec![u32::MAX; cap],
            g_score: vec![u32::MAX; cap],
            visited_tag: vec![0; cap],
            current_tag: 1,
            capacity: cap,
        }
    }

    fn ensure_capacity(&mut self, size: usize) {
        if size > self.capacity {
            self.capacity = size.max(self.capacity * 2);
            self.parents.resize(self.capacity, u32::MAX);
            self.g_score.resize(self.capacity, u32::MAX);
            self.visited_tag.resize(self.capacity, 0);
        }
    }

    fn reset(&mut self) {
        self.current_tag += 1;
        if self.current_tag == 0 {
            self.visited_tag.fill(0);
            self.current_tag = 1;
        }
    }

    /// Shortest 4-connected path from start to goal, inclusive. Unit step
    /// cost with a Manhattan heuristic, so the result is optimal. An
    /// obstructed neighbor is never expanded unless it is the goal itself.
    /// None when the frontier empties first; an expected outcome, the
    /// caller decides what a missing route means.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: GridCoord,
        goal: GridCoord,
    ) -> Option<Vec<GridCoord>> {
        let dims = grid.dims();
        self.ensure_capacity((dims as usize) * (dims as usize));
        self.reset();

        let index_of = |c: GridCoord| (c.y * dims + c.x) as usize;
        let coord_of = |idx: u32| GridCoord::new(idx % dims, idx / dims);

        let start_idx = index_of(start);
        self.parents[start_idx] = u32::MAX;
        self.g_score[start_idx] = 0;
        self.visited_tag[start_idx] = self.current_tag;

        let mut heap = BinaryHeap::new();
        heap.push(State {
            f_score: start.manhattan(goal),
            g_score: 0,
            index: start_idx as u32,
        });

        while let Some(State {
            g_score, index, ..
        }) = heap.pop()
        {
            let current = index as usize;
            if g_score > self.g_score[current] {
                // Stale heap entry; the node was re-reached cheaper.
                continue;
            }
            let position = coord_of(index);
            if position == goal {
                return Some(self.reconstruct(index, dims));
            }

            for neighbor in grid.neighbors(position) {
                if grid.is_obstacle(neighbor) && neighbor != goal {
                    continue;
                }
                let tentative = g_score + 1;
                let ni = index_of(neighbor);
                if self.visited_tag[ni] != self.current_tag || tentative < self.g_score[ni] {
                    self.parents[ni] = index;
                    self.g_score[ni] = tentative;
                    self.visited_tag[ni] = self.current_tag;
                    heap.push(State {
                        f_score: tentative + neighbor.manhattan(goal),
                        g_score: tentative,
                        index: ni as u32,
                    });
                }
            }
        }
        None
    }

    /// Walks predecessor indices from the goal back to the start, then
    /// reverses. Indices, never references; the arenas outlive the grid.
    fn reconstruct(&self, goal_idx: u32, dims: u32) -> Vec<GridCoord> {
        let mut path = Vec::new();
        let mut current = goal_idx;
        loop {
            path.push(GridCoord::new(current % dims, current / dims));
            let parent = self.parents[current as usize];
            if parent == u32::MAX {
                break;
            }
            current = parent;
        }
        path.reverse();
        path
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(path: &[GridCoord]) {
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn empty_grid_path_is_manhattan_optimal() {
        let grid = Grid::new(8, []);
        let mut solver = AStar::new();
        let start = GridCoord::new(1, 1);
        let goal = GridCoord::new(6, 4);

        let path = solver.find_path(&grid, start, goal).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len() as u32 - 1, start.manhattan(goal));
        assert_contiguous(&path);
    }

    #[test]
    fn wall_forces_a_detour() {
        // Vertical wall at x=2 with its only gap at y=4.
        let wall = (0..4).map(|y| GridCoord::new(2, y));
        let grid = Grid::new(5, wall);
        let mut solver = AStar::new();

        let path = solver
            .find_path(&grid, GridCoord::new(0, 0), GridCoord::new(4, 0))
            .unwrap();
        assert_eq!(path.len() - 1, 12);
        assert_contiguous(&path);
        assert!(path.contains(&GridCoord::new(2, 4)));
    }

    #[test]
    fn enclosed_goal_is_not_found() {
        let ring = [
            GridCoord::new(1, 2),
            GridCoord::new(3, 2),
            GridCoord::new(2, 1),
            GridCoord::new(2, 3),
        ];
        let grid = Grid::new(5, ring);
        let mut solver = AStar::new();
        assert!(
            solver
                .find_path(&grid, GridCoord::new(0, 0), GridCoord::new(2, 2))
                .is_none()
        );
    }

    #[test]
    fn goal_cell_may_be_obstructed() {
        // Terminal cells stay marked occupied for other nets; the goal
        // itself must still be reachable.
        let grid = Grid::new(4, [GridCoord::new(3, 0)]);
        let mut solver = AStar::new();
        let path = solver
            .find_path(&grid, GridCoord::new(0, 0), GridCoord::new(3, 0))
            .unwrap();
        assert_eq!(path.len() - 1, 3);
    }

    #[test]
    fn trivial_start_equals_goal() {
        let grid = Grid::new(3, []);
        let mut solver = AStar::new();
        let path = solver
            .find_path(&grid, GridCoord::new(1, 1), GridCoord::new(1, 1))
            .unwrap();
        assert_eq!(path, vec![GridCoord::new(1, 1)]);
    }

    #[test]
    fn solver_reuse_does_not_leak_state() {
        let mut solver = AStar::new();

        let blocked = Grid::new(3, [GridCoord::new(1, 0), GridCoord::new(0, 1)]);
        assert!(
            solver
                .find_path(&blocked, GridCoord::new(0, 0), GridCoord::new(2, 2))
                .is_none()
        );

        let open = Grid::new(3, []);
        let path = solver
            .find_path(&open, GridCoord::new(0, 0), GridCoord::new(2, 2))
            .unwrap();
        assert_eq!(path.len() - 1, 4);
    }
}

