use crate::db::design::Design;
use crate::db::layout::LayoutResult;
use crate::geom::rect::GridRect;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Re-checks the layout invariants on a finished result: every net routed,
/// paths 4-connected with consistent lengths, no cell shared between nets,
/// bounding box honest. This is the verification gate the CLI runs before
/// a layout is persisted.
pub fn run(design: &Design, layout: &LayoutResult) -> Result<(), String> {
    log::info!("Starting Layout Verification...");
    let valid = AtomicBool::new(true);

    let nets = design.net_list();
    if layout.nets != nets {
        log::error!("FAIL: Result net list does not match the design.");
        valid.store(false, Ordering::Relaxed);
    }
    if layout.routes.len() != nets.len() {
        log::error!(
            "FAIL: {} nets required, {} routed.",
            nets.len(),
            layout.routes.len()
        );
        valid.store(false, Ordering::Relaxed);
    }

    let (dim_w, dim_h) = layout.grid_dims;
    layout.routes.par_iter().for_each(|route| {
        if route.net as usize >= nets.len() {
            log::error!("FAIL: Route references unknown net {}.", route.net);
            valid.store(false, Ordering::Relaxed);
            return;
        }
        if route.cells.is_empty() {
            log::error!("FAIL: Net {} has an empty path.", route.net);
            valid.store(false, Ordering::Relaxed);
            return;
        }
        if route.length as usize != route.cells.len() - 1 {
            log::error!(
                "FAIL: Net {} length {} does not match its {} cells.",
                route.net,
                route.length,
                route.cells.len()
            );
            valid.store(false, Ordering::Relaxed);
        }
        for pair in route.cells.windows(2) {
            if pair[0].manhattan(pair[1]) != 1 {
                log::error!(
                    "FAIL: Net {} jumps from {:?} to {:?}.",
                    route.net,
                    pair[0],
                    pair[1]
                );
                valid.store(false, Ordering::Relaxed);
                break;
            }
        }
        for &cell in &route.cells {
            if cell.x >= dim_w || cell.y >= dim_h {
                log::error!("FAIL: Net {} leaves the grid at {:?}.", route.net, cell);
                valid.store(false, Ordering::Relaxed);
                break;
            }
        }
    });

    let mut claimed = HashMap::new();
    for route in &layout.routes {
        for &cell in &route.cells {
            if let Some(other) = claimed.insert(cell, route.net) {
                log::error!(
                    "FAIL: Nets {} and {} both occupy {:?}.",
                    other,
                    route.net,
                    cell
                );
                valid.store(false, Ordering::Relaxed);
            }
        }
    }

    let bbox = GridRect::covering(
        layout
            .routes
            .iter()
            .flat_map(|r| r.cells.iter().copied()),
    );
    if layout.bounding_box != bbox {
        log::error!(
            "FAIL: Reported bounding box {:?} differs from actual {:?}.",
            layout.bounding_box,
            bbox
        );
        valid.store(false, Ordering::Relaxed);
    }

    if valid.load(Ordering::Relaxed) {
        log::info!("\x1b[32mPASS\x1b[0m: Layout is valid.");
        Ok(())
    } else {
        Err("Layout verification failed.".to_string())
    }
}
