//! DOM input box for cell editing.
//!
//! An `<input>` absolutely positioned over the cell being edited, inside the
//! scroll container so it scrolls with the content. Removed from the DOM on drop.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::layout::CellRect;

pub(crate) struct InputOverlay {
    input: Option<HtmlInputElement>,
    /// Cell the input is currently shown for.
    cell_id: Option<String>,
}

impl InputOverlay {
    pub(crate) fn new() -> Self {
        Self {
            input: None,
            cell_id: None,
        }
    }

    /// The input element, created on first use and appended to `container`.
    pub(crate) fn element(&mut self, container: &HtmlElement) -> Option<&HtmlInputElement> {
        if self.input.is_none() {
            let document = web_sys::window().and_then(|w| w.document())?;
            self.input = Self::create(&document, container);
        }
        self.input.as_ref()
    }

    fn create(document: &Document, container: &HtmlElement) -> Option<HtmlInputElement> {
        let input = document
            .create_element("input")
            .ok()?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        input.set_type("text");
        let _ = input.set_attribute("data-grid-editor", "");
        let style = input.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("z-index", "3");
        let _ = style.set_property("box-sizing", "border-box");
        let _ = style.set_property("border", "2px solid #4285f4");
        let _ = style.set_property("outline", "none");
        let _ = style.set_property("padding", "0 4px");
        let _ = style.set_property("font-family", "inherit");
        let _ = style.set_property("font-size", "13px");
        let _ = style.set_property("background", "#fff");
        let _ = style.set_property("display", "none");
        container.append_child(&input).ok()?;
        Some(input)
    }

    /// Show the input over `rect` (content coordinates) for `cell_id`.
    ///
    /// Does nothing when already shown for that cell, so the caret survives re-syncs.
    pub(crate) fn show(&mut self, container: &HtmlElement, cell_id: &str, rect: CellRect, value: &str) {
        if self.cell_id.as_deref() == Some(cell_id) {
            return;
        }
        let Some(input) = self.element(container) else {
            return;
        };
        let style = input.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.width));
        let _ = style.set_property("height", &format!("{}px", rect.height));
        input.set_value(value);
        let _ = input.focus();
        self.cell_id = Some(cell_id.to_string());
    }

    pub(crate) fn hide(&mut self) {
        if self.cell_id.take().is_none() {
            return;
        }
        if let Some(input) = &self.input {
            let _ = input.style().set_property("display", "none");
            let _ = input.blur();
        }
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        if let Some(input) = &self.input {
            if let Some(parent) = input.parent_node() {
                let _ = parent.remove_child(input);
            }
        }
    }
}
