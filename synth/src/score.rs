use pcb_common::db::layout::RoutedNet;
use pcb_common::geom::rect::GridRect;

/// Scores a successful routing attempt; pure, higher is better.
///
/// Both objectives are normalized against grid-size extremes and combined
/// as a convex mix: the area term rewards a tight bounding box over all
/// routed cells, the length term rewards short total wiring. The weights
/// let a caller bias the search either way.
pub fn score(
    routes: &[RoutedNet],
    n_grid_spaces: u32,
    padding: u32,
    area_weight: f64,
    length_weight: f64,
) -> f64 {
    if routes.is_empty() {
        return area_weight + length_weight;
    }
    let dims = n_grid_spaces + padding;

    let worst_area = ((dims - 1) * (dims - 1)) as f64;
    let area_term = match GridRect::covering(routes.iter().flat_map(|r| r.cells.iter().copied())) {
        Some(bbox) => (1.0 - bbox.area() as f64 / worst_area).clamp(0.0, 1.0),
        None => 0.0,
    };

    let total_length: u32 = routes.iter().map(|r| r.length).sum();
    let worst_length = (routes.len() as u32 * dims * dims) as f64;
    let length_term = (1.0 - total_length as f64 / worst_length).clamp(0.0, 1.0);

    area_weight * area_term + length_weight * length_term
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_common::geom::coord::GridCoord;

    fn straight(net: u32, y: u32, len: u32) -> RoutedNet {
        RoutedNet::new(net, (0..=len).map(|x| GridCoord::new(x, y)).collect())
    }

    #[test]
    fn scoring_is_idempotent() {
        let routes = vec![straight(0, 0, 4), straight(1, 2, 4)];
        let a = score(&routes, 8, 4, 0.5, 0.5);
        let b = score(&routes, 8, 4, 0.5, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn area_only_weighting_ranks_by_bounding_box() {
        // Same total length, different spread.
        let tight = vec![straight(0, 0, 4), straight(1, 1, 4)];
        let sprawling = vec![straight(0, 0, 4), straight(1, 7, 4)];
        assert!(score(&tight, 8, 0, 1.0, 0.0) > score(&sprawling, 8, 0, 1.0, 0.0));
    }

    #[test]
    fn length_only_weighting_ranks_by_total_length() {
        let short = vec![straight(0, 0, 3), straight(1, 7, 3)];
        let long = vec![straight(0, 0, 6), straight(1, 1, 6)];
        // The short pair sprawls more, but only length may count.
        assert!(score(&short, 8, 0, 0.0, 1.0) > score(&long, 8, 0, 0.0, 1.0));
    }

    #[test]
    fn empty_routes_score_the_weight_sum() {
        assert_eq!(score(&[], 8, 4, 0.6, 0.4), 1.0);
    }
}
