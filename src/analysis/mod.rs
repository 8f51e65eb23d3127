pub mod graph;
pub mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use graph::*;
pub use resolver::*;
