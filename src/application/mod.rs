//! Application layer: the repository contract and filter composition.

pub mod filter;
pub mod repos;
