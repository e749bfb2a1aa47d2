//! Pipeline entry points for curriculum operations.
//!
//! - `run_gather`: Walk a catalog and write the school tree
//! - `transform_file`: Flatten a gathered file into the lookup format

pub mod gather;
pub mod transform;

pub use gather::{CatalogWalker, run_gather};
pub use transform::{flatten, transform_file};
