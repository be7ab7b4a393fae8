pub mod random;

pub use random::{Placement, place};
