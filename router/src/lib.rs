pub mod algo;
pub mod driver;
pub mod grid;

pub use algo::astar::AStar;
pub use driver::route_nets;
pub use grid::Grid;
