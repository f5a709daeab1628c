//! Data types for the grid engine.

mod column;
mod config;
mod row;
mod sort;
mod span;
mod summary;

pub use column::*;
pub use config::*;
pub use row::*;
pub use sort::*;
pub use span::*;
pub use summary::*;
