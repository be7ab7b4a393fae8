pub mod astar;
