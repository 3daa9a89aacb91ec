//! Browser tests for the DOM bindings: listener lifetime across mount and unmount.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect, JSON};
use sheetgrid::GridViewer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, EventTarget, HtmlElement, KeyboardEvent, KeyboardEventInit, MouseEvent};

wasm_bindgen_test_configure!(run_in_browser);

/// Host object whose `onSelectionChange` counts its calls.
struct Host {
    object: Object,
    selection_calls: Rc<Cell<u32>>,
    _callbacks: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl Host {
    fn new() -> Self {
        let selection_calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&selection_calls);
        let callbacks: Vec<(&str, Closure<dyn FnMut(JsValue)>)> = vec![
            ("updateCell", Closure::new(|_: JsValue| {})),
            ("bulkUpdateCells", Closure::new(|_: JsValue| {})),
            (
                "onSelectionChange",
                Closure::new(move |_: JsValue| counter.set(counter.get() + 1)),
            ),
        ];
        let object = Object::new();
        for (name, closure) in &callbacks {
            let f: &Function = closure.as_ref().unchecked_ref();
            Reflect::set(&object, &JsValue::from_str(name), f).unwrap();
        }
        Self {
            object,
            selection_calls,
            _callbacks: callbacks.into_iter().map(|(_, c)| c).collect(),
        }
    }

    fn calls(&self) -> u32 {
        self.selection_calls.get()
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(host: &Host) -> GridViewer {
    let container: HtmlElement = document().create_element("div").unwrap().dyn_into().unwrap();
    let sheet = JSON::parse(r#"{"id":"s","name":"S","rowCount":20,"colCount":4}"#).unwrap();
    GridViewer::new(container, sheet, JsValue::UNDEFINED, host.object.clone().into()).unwrap()
}

fn press_on_document() {
    let event = MouseEvent::new("mousedown").unwrap();
    let target: &EventTarget = document().as_ref();
    target.dispatch_event(&event).unwrap();
}

fn arrow_down_on_body() {
    let init = KeyboardEventInit::new();
    init.set_key("ArrowDown");
    init.set_bubbles(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    let body: EventTarget = document().body().unwrap().into();
    body.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn document_listeners_drive_a_mounted_grid() {
    let host = Host::new();
    let viewer = mount(&host);
    assert!(viewer.click_cell("A1", false));
    assert_eq!(host.calls(), 1);

    arrow_down_on_body();
    assert_eq!(viewer.selected_cells(), ["A2"]);
    assert_eq!(host.calls(), 2);

    press_on_document();
    assert!(viewer.selected_cells().is_empty());
    assert_eq!(host.calls(), 3);
}

#[wasm_bindgen_test]
fn unmounted_grids_leave_no_document_listeners() {
    let host = Host::new();
    for _ in 0..3 {
        let viewer = mount(&host);
        assert!(viewer.click_cell("B2", false));
        drop(viewer);
    }
    let before = host.calls();
    assert_eq!(before, 3);

    arrow_down_on_body();
    press_on_document();
    assert_eq!(host.calls(), before, "a dropped grid still reacted to document events");
}
