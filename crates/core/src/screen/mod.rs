pub mod filter;
pub mod score;

pub use filter::{filter, FilterCriteria, NO_MAX};
pub use score::score;
