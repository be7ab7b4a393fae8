//! Random placement generation.
//!
//! Each component's terminal cells are sampled uniformly into the core
//! square, one terminal at a time along orthogonal offsets. A candidate
//! colliding with an already-claimed cell is resampled from scratch,
//! bounded by the configured budget; exhaustion rejects the whole attempt
//! so the search loop can draw a fresh seed.

use pcb_common::db::design::{Component, Design, PinRef};
use pcb_common::db::indices::ComponentId;
use pcb_common::error::PlacementError;
use pcb_common::geom::coord::GridCoord;
use pcb_common::util::config::SynthesisConfig;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// The four legal terminal-to-terminal extensions. Diagonals are excluded;
/// routed traces may not cross corner-to-corner.
pub const ORIENTATIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Grid cells assigned to every component's terminals for one attempt.
#[derive(Clone, Debug)]
pub struct Placement {
    positions: Vec<Vec<GridCoord>>,
    index: HashMap<u32, ComponentId>,
}

impl Placement {
    /// Wraps pre-assigned positions, one cell list per component in design
    /// order. Used when the caller fixes the placement itself.
    pub fn new(design: &Design, positions: Vec<Vec<GridCoord>>) -> Self {
        Self {
            positions,
            index: design.id_map(),
        }
    }

    pub fn positions(&self, component: ComponentId) -> &[GridCoord] {
        &self.positions[component.index()]
    }

    /// Cell holding the given terminal. The pin must belong to a validated
    /// design; an unknown reference is a caller bug and panics.
    pub fn terminal_cell(&self, pin: PinRef) -> GridCoord {
        let component = self.index[&pin.component];
        self.positions[component.index()][pin.pin as usize]
    }

    pub fn all_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.positions.iter().flatten().copied()
    }
}

/// Assigns every component's terminals to cells in the core square, then
/// shifts the whole placement by half the padding so a uniform routing
/// margin surrounds it.
pub fn place(
    design: &Design,
    config: &SynthesisConfig,
    rng: &mut impl Rng,
) -> Result<Placement, PlacementError> {
    let core = config.n_grid_spaces;
    let mut claimed: HashSet<GridCoord> = HashSet::new();
    let mut positions = Vec::with_capacity(design.components.len());

    for comp in &design.components {
        match sample_component(comp, core, &claimed, config.max_place_attempts, rng) {
            Some(cells) => {
                claimed.extend(cells.iter().copied());
                positions.push(cells);
            }
            None => {
                log::debug!(
                    "placement exhausted on component {} ({} cells claimed)",
                    comp.id,
                    claimed.len()
                );
                return Err(PlacementError {
                    component: comp.id,
                    attempts: config.max_place_attempts,
                });
            }
        }
    }

    let shift = config.padding / 2;
    for cells in &mut positions {
        for cell in cells {
            *cell = cell.translate(shift, shift);
        }
    }

    Ok(Placement {
        positions,
        index: design.id_map(),
    })
}

fn sample_component(
    comp: &Component,
    core: u32,
    claimed: &HashSet<GridCoord>,
    budget: usize,
    rng: &mut impl Rng,
) -> Option<Vec<GridCoord>> {
    'attempt: for _ in 0..budget {
        let head = GridCoord::new(rng.gen_range(0..core), rng.gen_range(0..core));
        if claimed.contains(&head) {
            continue;
        }
        let mut cells = vec![head];
        for _ in 1..comp.terminals {
            let tail = *cells.last().unwrap();
            // Offsets leaving the core square are pruned before sampling; a
            // corner terminal may only extend inward.
            let open: Vec<GridCoord> = ORIENTATIONS
                .iter()
                .filter_map(|&(dx, dy)| tail.offset(dx, dy, core))
                .collect();
            if open.is_empty() {
                continue 'attempt;
            }
            let cell = open[rng.gen_range(0..open.len())];
            if claimed.contains(&cell) || cells.contains(&cell) {
                continue 'attempt;
            }
            cells.push(cell);
        }
        return Some(cells);
    }
    None
}
