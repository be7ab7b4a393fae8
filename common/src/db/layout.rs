use crate::db::design::Net;
use crate::geom::coord::GridCoord;
use crate::geom::rect::GridRect;
use serde::{Deserialize, Serialize};

/// One routed net: the inclusive cell sequence from its first terminal
/// to its second, plus the step count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutedNet {
    /// Index into the design's derived net list.
    pub net: u32,
    pub cells: Vec<GridCoord>,
    pub length: u32,
}

impl RoutedNet {
    pub fn new(net: u32, cells: Vec<GridCoord>) -> Self {
        let length = (cells.len().saturating_sub(1)) as u32;
        Self { net, cells, length }
    }
}

/// The best layout retained by the search loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Nets in design net-list order, echoed back so the document layer
    /// does not need to re-derive them.
    pub nets: Vec<Net>,
    pub routes: Vec<RoutedNet>,
    pub score: f64,
    pub grid_dims: (u32, u32),
    /// Minimal frame covering every routed cell; what the trim step drops
    /// the padding border down to.
    pub bounding_box: Option<GridRect>,
}

impl LayoutResult {
    /// Translates every path into the minimal bounding frame, dropping
    /// the unused routing margin before the result is handed to a
    /// renderer. Thin coordinate shift, no re-routing.
    pub fn trim(&mut self) {
        let Some(bbox) = self.bounding_box else {
            return;
        };
        let (dx, dy) = (bbox.min.x, bbox.min.y);
        for route in &mut self.routes {
            for cell in &mut route.cells {
                cell.x -= dx;
                cell.y -= dy;
            }
        }
        self.grid_dims = (bbox.width() + 1, bbox.height() + 1);
        self.bounding_box = Some(GridRect::new(
            GridCoord::new(0, 0),
            GridCoord::new(bbox.width(), bbox.height()),
        ));
    }
}
