pub mod builder;
pub mod stats;


pub use builder::*;
pub use stats::*;
