//! Data loading and in-memory representations.
//!
//! Survey data moves through three shapes:
//!
//! - [`RawTable`]: untyped cells as read from the delimited input file.
//! - [`Frame`]: named, typed columns after recoding.
//! - [`InMemoryDataset`]: the numeric feature matrix and encoded labels used
//!   for balancing, training and evaluation.

pub mod frame;
pub mod memory;
pub mod table;

pub use self::frame::{Column, Frame};
pub use self::memory::InMemoryDataset;
pub use self::table::RawTable;
