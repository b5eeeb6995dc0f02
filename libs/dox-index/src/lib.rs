//! Doxygen compound index and symbol resolution.
//!
//! Turns a directory of Doxygen XML into the ordered list of definitions that
//! belong to one namespace:
//!
//! 1. [`CompoundIndex`] merges every compound file into one document.
//! 2. [`Resolver`] finds the public header, collects refids and resolves them
//!    on a worker pool.
//! 3. [`order_definitions`] sorts them by declaration line.

pub mod compound;
pub mod definition;
pub mod error;
pub mod ordering;
mod pool;
pub mod resolver;

pub use compound::{CompoundIndex, INDEX_FILE};
pub use definition::{write_definitions, Definition, Kind, DEFS_FILE};
pub use error::{IndexError, IndexResult};
pub use ordering::order_definitions;
pub use resolver::Resolver;
