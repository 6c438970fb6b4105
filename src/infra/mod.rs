//! Storage backends and operational plumbing.

pub mod content;
pub mod db;
mod error;
pub mod telemetry;

pub use error::InfraError;
