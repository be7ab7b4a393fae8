pub mod score;
pub mod search;

pub use search::synthesize_layout;
