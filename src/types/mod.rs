//! Data types for the grid core.

mod cell;
mod selection;
mod sheet;

pub use cell::*;
pub use selection::*;
pub use sheet::*;
