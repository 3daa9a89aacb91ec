//! sheetgrid - spreadsheet grid core for the web
//!
//! The non-visual half of a browser spreadsheet, compiled to WebAssembly:
//! - A1-style cell addressing (`A1`, `Z100`, `AA7`)
//! - Click, shift-click, drag and keyboard range selection
//! - Row virtualization with a buffered window over 100k rows
//! - In-place editing committed through a host cell store
//! - Column type inference, naming and selection statistics
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridViewer } from 'sheetgrid';
//! await init();
//! const grid = new GridViewer(container, sheet, undefined, host);
//! grid.selectRange('B2', 'C4');
//! console.log(grid.selectionStats());
//! ```
//!
//! # Usage (Rust)
//!
//! [`GridView`] is the same grid without a DOM; everything except the
//! `viewer` module builds and tests natively.

// Data model and addressing
pub mod cell_ref;
pub mod config;
pub mod error;
pub mod types;

// Grid behavior
pub mod collab;
pub mod editor;
pub mod grid;
pub mod layout;
pub mod render;
pub mod selection;
pub mod sort;

// Column analysis
pub mod analysis;

// DOM bindings
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use grid::GridView;
#[cfg(target_arch = "wasm32")]
pub use viewer::GridViewer;

pub use types::*;

/// Analyze a sheet given as JSON and return the report as a JSON string
///
/// # Errors
/// Returns an error if the JSON is not a valid sheet.
#[wasm_bindgen(js_name = "analyzeSheet")]
pub fn analyze_sheet_json(sheet_json: &str) -> Result<String, JsValue> {
    let sheet = Sheet::from_json(sheet_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    analysis::analyze_sheet(&sheet)
        .to_json()
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Cell ids between two corners, row-major. Empty when either id is malformed.
#[wasm_bindgen(js_name = "rangeBetween")]
#[must_use]
pub fn range_between(a: &str, b: &str) -> Vec<String> {
    selection::range_between(a, b)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
