//! Routing driver: one attempt to realize every net on a shared grid.
//!
//! Terminal cells obstruct all nets except the one they belong to, and
//! every routed path becomes an obstruction for the nets after it, so the
//! processing order matters. On failure the order is reshuffled and the
//! whole attempt redone from scratch, bounded by `4 x net_count` tries.

use crate::algo::astar::AStar;
use crate::grid::Grid;
use pcb_common::db::design::Net;
use pcb_common::db::layout::RoutedNet;
use pcb_common::error::RouteError;
use pcb_placer::Placement;
use rand::Rng;
use rand::seq::SliceRandom;

/// Routes every net or fails the attempt as a whole; no partial path set
/// is ever returned.
pub fn route_nets(
    placement: &Placement,
    nets: &[Net],
    dims: u32,
    solver: &mut AStar,
    rng: &mut impl Rng,
) -> Result<Vec<RoutedNet>, RouteError> {
    let mut order: Vec<usize> = (0..nets.len()).collect();
    let max_reshuffles = 4 * nets.len();
    let mut last_failed = 0u32;

    for attempt in 0..=max_reshuffles {
        if attempt > 0 {
            order.shuffle(rng);
        }
        match route_once(placement, nets, &order, dims, solver) {
            Ok(routes) => {
                if attempt > 0 {
                    log::debug!("routed all {} nets after {} reshuffles", nets.len(), attempt);
                }
                return Ok(routes);
            }
            Err(net) => last_failed = net,
        }
    }

    Err(RouteError {
        net: last_failed,
        reshuffles: max_reshuffles,
    })
}

fn route_once(
    placement: &Placement,
    nets: &[Net],
    order: &[usize],
    dims: u32,
    solver: &mut AStar,
) -> Result<Vec<RoutedNet>, u32> {
    // Every placed terminal starts out as an obstruction; a net's own two
    // endpoints are lifted just for its search, then restored along with
    // the discovered path.
    let mut grid = Grid::new(dims, placement.all_cells());
    let mut routes = Vec::with_capacity(nets.len());

    for &i in order {
        let net = nets[i];
        let start = placement.terminal_cell(net.a);
        let goal = placement.terminal_cell(net.b);
        grid.clear_obstacle(start);
        grid.clear_obstacle(goal);

        let Some(cells) = solver.find_path(&grid, start, goal) else {
            return Err(i as u32);
        };
        for &cell in &cells {
            grid.set_obstacle(cell);
        }
        routes.push(RoutedNet::new(i as u32, cells));
    }

    routes.sort_by_key(|r| r.net);
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_common::db::design::{Component, Design, PinRef};
    use pcb_common::geom::coord::GridCoord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn two_part_design() -> Design {
        let mut design = Design::new();
        design.add_component(Component::new(0, "C1", 2));
        design.add_component(Component::new(1, "C2", 2));
        design
    }

    #[test]
    fn routes_through_a_free_channel() {
        // 3x3 core, parts on the outer columns, one free column between.
        let mut design = two_part_design();
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 0));
        let placement = Placement::new(
            &design,
            vec![
                vec![GridCoord::new(0, 0), GridCoord::new(0, 1)],
                vec![GridCoord::new(2, 0), GridCoord::new(2, 1)],
            ],
        );

        let mut solver = AStar::new();
        let mut rng = StdRng::seed_from_u64(1);
        let routes =
            route_nets(&placement, &design.net_list(), 3, &mut solver, &mut rng).unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].cells.first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(routes[0].cells.last(), Some(&GridCoord::new(2, 0)));
        assert_eq!(routes[0].length, 2);
    }

    #[test]
    fn paths_of_distinct_nets_are_disjoint() {
        let mut design = two_part_design();
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 0));
        design.add_connection(PinRef::new(0, 1), PinRef::new(1, 1));
        let placement = Placement::new(
            &design,
            vec![
                vec![GridCoord::new(0, 0), GridCoord::new(0, 1)],
                vec![GridCoord::new(2, 0), GridCoord::new(2, 1)],
            ],
        );

        let mut solver = AStar::new();
        let mut rng = StdRng::seed_from_u64(2);
        let routes =
            route_nets(&placement, &design.net_list(), 3, &mut solver, &mut rng).unwrap();

        assert_eq!(routes.len(), 2);
        let mut seen = HashSet::new();
        for route in &routes {
            for &cell in &route.cells {
                assert!(seen.insert(cell), "cell {:?} shared between nets", cell);
            }
        }
    }

    #[test]
    fn routes_avoid_foreign_terminals() {
        // A third, unconnected part sits next to the channel; no route may
        // run through its cells.
        let mut design = two_part_design();
        design.add_component(Component::new(2, "C3", 2));
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 0));
        let placement = Placement::new(
            &design,
            vec![
                vec![GridCoord::new(0, 2), GridCoord::new(0, 3)],
                vec![GridCoord::new(4, 2), GridCoord::new(4, 3)],
                vec![GridCoord::new(2, 2), GridCoord::new(2, 3)],
            ],
        );

        let mut solver = AStar::new();
        let mut rng = StdRng::seed_from_u64(5);
        let routes =
            route_nets(&placement, &design.net_list(), 5, &mut solver, &mut rng).unwrap();

        let endpoints = [GridCoord::new(0, 2), GridCoord::new(4, 2)];
        let foreign: HashSet<GridCoord> = placement
            .all_cells()
            .filter(|c| !endpoints.contains(c))
            .collect();
        for &cell in &routes[0].cells {
            assert!(!foreign.contains(&cell), "route crosses terminal {:?}", cell);
        }
    }

    #[test]
    fn fully_obstructed_net_fails_the_attempt() {
        // Start at (0,0); its only neighbors (1,0) and (0,1) are terminals
        // of other components, so no reshuffle can help.
        let mut design = two_part_design();
        design.add_component(Component::new(2, "C3", 2));
        design.add_connection(PinRef::new(0, 0), PinRef::new(2, 1));
        let placement = Placement::new(
            &design,
            vec![
                vec![GridCoord::new(0, 0), GridCoord::new(0, 1)],
                vec![GridCoord::new(1, 0), GridCoord::new(2, 0)],
                vec![GridCoord::new(1, 2), GridCoord::new(2, 2)],
            ],
        );

        let mut solver = AStar::new();
        let mut rng = StdRng::seed_from_u64(3);
        let err =
            route_nets(&placement, &design.net_list(), 3, &mut solver, &mut rng).unwrap_err();
        assert_eq!(err.reshuffles, 4);
    }

    #[test]
    fn no_nets_routes_trivially() {
        let design = two_part_design();
        let placement = Placement::new(
            &design,
            vec![
                vec![GridCoord::new(0, 0), GridCoord::new(0, 1)],
                vec![GridCoord::new(2, 0), GridCoord::new(2, 1)],
            ],
        );
        let mut solver = AStar::new();
        let mut rng = StdRng::seed_from_u64(4);
        let routes = route_nets(&placement, &[], 3, &mut solver, &mut rng).unwrap();
        assert!(routes.is_empty());
    }
}
