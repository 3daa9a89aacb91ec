//! Layout engine for cell positions and viewport management.
//!
//! This module handles:
//! - Cell rectangles and hit testing for the fixed-size grid
//! - Viewport state (scroll position, visible row window)
//! - The bottom-of-content check behind the add-rows control

mod grid_layout;
mod viewport;

pub use grid_layout::{CellRect, GridLayout, HitTarget};
pub use viewport::{RowWindow, Viewport};
