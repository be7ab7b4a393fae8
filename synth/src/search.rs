//! Monte Carlo layout search: generate, route, score, keep the best.
//!
//! Iterations are independent, so they run in parallel batches with
//! per-worker solver state; the only shared slot is the best-so-far
//! layout behind a mutex. Each iteration derives its own RNG from the
//! base seed, making a seeded run reproducible regardless of scheduling.

use crate::score::score;
use pcb_common::db::design::{Design, Net};
use pcb_common::db::layout::{LayoutResult, RoutedNet};
use pcb_common::error::SynthError;
use pcb_common::geom::rect::GridRect;
use pcb_common::util::config::SynthesisConfig;
use pcb_router::AStar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const ITER_BATCH: usize = 64;

struct Best {
    routes: Vec<RoutedNet>,
    score: f64,
    iteration: usize,
}

/// Runs the full placement-and-routing search and returns the best layout
/// found, or a typed failure when every iteration was rejected.
pub fn synthesize_layout(
    design: &Design,
    config: &SynthesisConfig,
) -> Result<LayoutResult, SynthError> {
    design.validate(config.n_grid_spaces)?;

    let nets = design.net_list();
    let dims = config.grid_dims();

    if nets.is_empty() {
        log::warn!("Design has no connections; nothing to route.");
        return Ok(result_from(vec![], nets, config, dims));
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    log::info!(
        "Starting layout search: {} components, {} nets, {}x{} grid, seed {:#x}",
        design.components.len(),
        nets.len(),
        dims,
        dims,
        base_seed
    );

    let best: Mutex<Option<Best>> = Mutex::new(None);
    let rejected = AtomicUsize::new(0);
    let mut completed = 0;

    while completed < config.max_iters {
        let end = (completed + ITER_BATCH).min(config.max_iters);
        (completed..end)
            .into_par_iter()
            .for_each_with(AStar::new(), |solver, iteration| {
                match run_iteration(design, &nets, config, dims, solver, base_seed, iteration) {
                    Some((routes, attempt_score)) => {
                        let mut slot = best.lock().unwrap();
                        let better = match &*slot {
                            None => true,
                            Some(b) => {
                                attempt_score > b.score
                                    || (attempt_score == b.score && iteration < b.iteration)
                            }
                        };
                        if better {
                            *slot = Some(Best {
                                routes,
                                score: attempt_score,
                                iteration,
                            });
                        }
                    }
                    None => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        completed = end;
        log::debug!("{}/{} iterations done", completed, config.max_iters);

        let reached_target = best
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|b| b.score >= config.target_score);
        if reached_target {
            log::info!("Target score reached after {} iterations.", completed);
            break;
        }
    }

    let best = best.into_inner().unwrap();
    match best {
        Some(b) => {
            log::info!(
                "Search done: best score {:.4} (iteration {}, {} of {} attempts rejected)",
                b.score,
                b.iteration,
                rejected.load(Ordering::Relaxed),
                completed
            );
            Ok(result_from(b.routes, nets, config, dims))
        }
        None => Err(SynthError::NoLayoutFound {
            iterations: completed,
        }),
    }
}

/// One placement/route/score cycle. None means the attempt was rejected,
/// a normal outcome the loop absorbs.
fn run_iteration(
    design: &Design,
    nets: &[Net],
    config: &SynthesisConfig,
    dims: u32,
    solver: &mut AStar,
    base_seed: u64,
    iteration: usize,
) -> Option<(Vec<RoutedNet>, f64)> {
    let mut rng =
        StdRng::seed_from_u64(base_seed ^ (iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

    let placement = match pcb_placer::place(design, config, &mut rng) {
        Ok(p) => p,
        Err(e) => {
            log::trace!("iteration {} rejected: {}", iteration, e);
            return None;
        }
    };

    let routes = match pcb_router::route_nets(&placement, nets, dims, solver, &mut rng) {
        Ok(r) => r,
        Err(e) => {
            log::trace!("iteration {} rejected: {}", iteration, e);
            return None;
        }
    };

    let s = score(
        &routes,
        config.n_grid_spaces,
        config.padding,
        config.area_weight,
        config.length_weight,
    );
    Some((routes, s))
}

fn result_from(
    routes: Vec<RoutedNet>,
    nets: Vec<Net>,
    config: &SynthesisConfig,
    dims: u32,
) -> LayoutResult {
    let s = score(
        &routes,
        config.n_grid_spaces,
        config.padding,
        config.area_weight,
        config.length_weight,
    );
    let bounding_box = GridRect::covering(routes.iter().flat_map(|r| r.cells.iter().copied()));
    LayoutResult {
        nets,
        routes,
        score: s,
        grid_dims: (dims, dims),
        bounding_box,
    }
}
