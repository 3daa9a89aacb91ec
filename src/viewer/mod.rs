//! `GridViewer`: the WASM-exported grid component.
//!
//! This module wires a [`GridView`] to the DOM:
//! - A scroll container supplied by the host, with a spacer sized to the content
//! - Pointer, wheel, scroll and keyboard subscriptions scoped to the viewer's lifetime
//! - An `<input>` overlay for cell editing
//! - Host callbacks for cell persistence, selection changes, row growth and rendering
//!
//! Drawing is the host's job: after every state change the host's `render`
//! callback receives the current frame.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! const grid = new GridViewer(container, sheet, { bufferRows: 10 }, {
//!   updateCell: (id, value) => store.update(id, value),
//!   bulkUpdateCells: (updates) => store.bulkUpdate(updates),
//!   onSelectionChange: (ids) => setSelected(ids),
//!   render: (frame) => draw(frame),
//! });
//! // later
//! grid.free(); // removes every listener and the edit input
//! ```
//!
//! `updateCell` runs while the grid is mid-update and must not call back into
//! the viewer synchronously.

mod events;
mod host;
mod input;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlElement, HtmlInputElement};

use crate::cell_ref;
use crate::config::GridConfig;
use crate::error::{Result, SheetGridError};
use crate::grid::GridView;
use crate::sort::SortDirection;
use crate::types::{CellUpdate, Sheet};
use events::ListenerSet;
use host::{to_js, HostCallbacks, JsCellStore, Outbox};
use input::InputOverlay;

/// Narrow a DOM pixel value to the grid's `f32` units.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn px(value: f64) -> f32 {
    value as f32
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| SheetGridError::Other(format!("Deserialization error: {e}")))
}

// ============================================================================
// Console logging
// ============================================================================

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[sheetgrid] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` records to the browser console. Later calls only change the level.
#[wasm_bindgen(js_name = "setLogLevel")]
pub fn set_log_level(level: &str) {
    let _ = log::set_logger(&LOGGER);
    let filter = match level.to_ascii_lowercase().as_str() {
        "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };
    log::set_max_level(filter);
}

// ============================================================================
// Shared state
// ============================================================================

/// State reachable from event closures.
pub(crate) struct Shared {
    pub(crate) container: HtmlElement,
    grid: RefCell<GridView>,
    spacer: Option<HtmlElement>,
    overlay: RefCell<InputOverlay>,
    outbox: Rc<Outbox>,
    callbacks: HostCallbacks,
}

impl Shared {
    /// Run `f` on the grid unless it is already borrowed further up the stack
    /// (a DOM event fired synchronously from inside another handler).
    pub(crate) fn with_grid<R>(&self, f: impl FnOnce(&mut GridView) -> R) -> Option<R> {
        match self.grid.try_borrow_mut() {
            Ok(mut grid) => Some(f(&mut grid)),
            Err(_) => {
                log::trace!("grid busy in an outer handler, event skipped");
                None
            }
        }
    }

    /// Read-only counterpart of [`Shared::with_grid`].
    pub(crate) fn read_grid<R>(&self, f: impl FnOnce(&GridView) -> R) -> Option<R> {
        match self.grid.try_borrow() {
            Ok(grid) => Some(f(&grid)),
            Err(_) => {
                log::trace!("grid mutably borrowed by an outer handler, read skipped");
                None
            }
        }
    }

    /// Like [`Shared::read_grid`], failing when the grid is borrowed further up the stack.
    pub(crate) fn try_read_grid<R>(&self, f: impl FnOnce(&GridView) -> R) -> Result<R> {
        self.read_grid(f)
            .ok_or_else(|| SheetGridError::Other("grid is in use by an outer call".into()))
    }

    pub(crate) fn container_scroll(&self) -> (f32, f32) {
        let read = |name: &str| {
            Reflect::get(self.container.as_ref(), &JsValue::from_str(name))
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
        };
        (px(read("scrollLeft")), px(read("scrollTop")))
    }

    fn set_container_scroll(&self, left: f32, top: f32) {
        let (cur_left, cur_top) = self.container_scroll();
        let target: &JsValue = self.container.as_ref();
        if (cur_left - left).abs() >= 0.5 {
            let _ = Reflect::set(target, &JsValue::from_str("scrollLeft"), &JsValue::from_f64(f64::from(left)));
        }
        if (cur_top - top).abs() >= 0.5 {
            let _ = Reflect::set(target, &JsValue::from_str("scrollTop"), &JsValue::from_f64(f64::from(top)));
        }
    }

    pub(crate) fn editor_value(&self) -> Option<String> {
        let mut overlay = self.overlay.try_borrow_mut().ok()?;
        overlay
            .element(&self.container)
            .map(HtmlInputElement::value)
    }

    /// Push pending state to the DOM and the host.
    pub(crate) fn sync(&self) {
        let frame = {
            let Ok(mut grid) = self.grid.try_borrow_mut() else {
                return;
            };
            if grid.take_needs_render() {
                self.sync_dom(&grid);
                Some(grid.frame())
            } else {
                None
            }
        };
        self.callbacks.deliver(&self.outbox);
        let (Some(frame), Some(render)) = (frame, &self.callbacks.render) else {
            return;
        };
        match to_js(&frame) {
            Ok(value) => {
                if let Err(e) = render.call1(&JsValue::NULL, &value) {
                    log::warn!("render callback threw: {e:?}");
                }
            }
            Err(e) => log::error!("{e}"),
        }
    }

    fn sync_dom(&self, grid: &GridView) {
        let layout = grid.layout();
        if let Some(spacer) = &self.spacer {
            let style = spacer.style();
            let _ = style.set_property("width", &format!("{}px", layout.total_width()));
            let _ = style.set_property("height", &format!("{}px", layout.total_height()));
        }
        let viewport = grid.viewport();
        self.set_container_scroll(viewport.scroll_left, viewport.scroll_top);

        let Ok(mut overlay) = self.overlay.try_borrow_mut() else {
            return;
        };
        let editing = grid
            .editing_cell()
            .and_then(|id| cell_ref::decode(id).map(|coord| (id, coord)));
        match editing {
            Some((id, coord)) => {
                let rect = layout.cell_rect(coord.row, coord.col);
                overlay.show(&self.container, id, rect, grid.edit_input().unwrap_or_default());
            }
            None => overlay.hide(),
        }
    }

    fn request_render(&self) {
        self.with_grid(GridView::invalidate);
        self.sync();
    }
}

fn create_spacer(container: &HtmlElement) -> Option<HtmlElement> {
    let document = web_sys::window().and_then(|w| w.document())?;
    let spacer = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let style = spacer.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("left", "0");
    let _ = style.set_property("pointer-events", "none");
    let _ = spacer.set_attribute("data-grid-spacer", "");
    container.append_child(&spacer).ok()?;
    Some(spacer)
}

// ============================================================================
// Exported component
// ============================================================================

/// The grid component exported to JavaScript.
#[wasm_bindgen]
pub struct GridViewer {
    // Declared first so listeners are removed before the shared state goes.
    #[allow(dead_code)]
    listeners: ListenerSet,
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl GridViewer {
    /// Mount a grid in `container` (a scrollable element owned by the host).
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, sheet: JsValue, config: JsValue, host: JsValue) -> std::result::Result<GridViewer, JsValue> {
        console_error_panic_hook::set_once();

        let sheet: Sheet = from_js(sheet)?;
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            from_js(config)?
        };
        let store = Rc::new(JsCellStore::from_host(&host)?);
        let outbox = Rc::new(Outbox::default());
        let mut grid = GridView::new(sheet, config, store)?
            .with_observer(Rc::clone(&outbox) as Rc<dyn crate::collab::SelectionObserver>)
            .with_row_growth(Rc::clone(&outbox) as Rc<dyn crate::collab::RowGrowth>);
        grid.resize(
            px(f64::from(container.client_width())),
            px(f64::from(container.client_height())),
        );

        let style = container.style();
        if style.get_property_value("position").unwrap_or_default().is_empty() {
            let _ = style.set_property("position", "relative");
        }
        let _ = style.set_property("overflow", "auto");
        if container.get_attribute("tabindex").is_none() {
            let _ = container.set_attribute("tabindex", "0");
        }

        let shared = Rc::new(Shared {
            spacer: create_spacer(&container),
            container,
            grid: RefCell::new(grid),
            overlay: RefCell::new(InputOverlay::new()),
            outbox,
            callbacks: HostCallbacks::from_host(&host),
        });
        let listeners = events::attach(&shared);
        shared.sync();
        log::info!("grid mounted");

        Ok(GridViewer { listeners, shared })
    }

    /// Replace the sheet snapshot.
    #[wasm_bindgen(js_name = "setSheet")]
    pub fn set_sheet(&self, sheet: JsValue) -> std::result::Result<(), JsValue> {
        let sheet: Sheet = from_js(sheet)?;
        self.shared.with_grid(|g| g.set_sheet(sheet));
        self.shared.sync();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setLoading")]
    pub fn set_loading(&self, loading: bool) {
        self.shared.with_grid(|g| g.set_loading(loading));
        self.shared.sync();
    }

    /// Re-read the container size.
    pub fn resize(&self) {
        let width = px(f64::from(self.shared.container.client_width()));
        let height = px(f64::from(self.shared.container.client_height()));
        self.shared.with_grid(|g| g.resize(width, height));
        self.shared.sync();
    }

    /// Current render frame.
    pub fn frame(&self) -> std::result::Result<JsValue, JsValue> {
        let frame = self.shared.try_read_grid(GridView::frame)?;
        Ok(to_js(&frame)?)
    }

    /// Force a render callback.
    pub fn invalidate(&self) {
        self.shared.request_render();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = "selectedCells")]
    pub fn selected_cells(&self) -> Vec<String> {
        self.shared
            .read_grid(|g| g.selected_cells().to_vec())
            .unwrap_or_default()
    }

    pub fn anchor(&self) -> Option<String> {
        self.shared
            .read_grid(|g| g.anchor().map(str::to_string))
            .flatten()
    }

    #[wasm_bindgen(js_name = "clickCell")]
    pub fn click_cell(&self, id: &str, shift: bool) -> bool {
        let changed = self.shared.with_grid(|g| g.click_cell(id, shift)).unwrap_or(false);
        self.shared.sync();
        changed
    }

    #[wasm_bindgen(js_name = "selectRange")]
    pub fn select_range(&self, a: &str, b: &str) -> bool {
        let changed = self.shared.with_grid(|g| g.select_range(a, b)).unwrap_or(false);
        self.shared.sync();
        changed
    }

    #[wasm_bindgen(js_name = "selectRef")]
    pub fn select_ref(&self, range: &str) -> bool {
        let changed = self.shared.with_grid(|g| g.select_ref(range)).unwrap_or(false);
        self.shared.sync();
        changed
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = "beginEdit")]
    pub fn begin_edit(&self, id: &str) -> std::result::Result<(), JsValue> {
        let result = self.shared.with_grid(|g| g.begin_edit(id, None));
        self.shared.sync();
        Ok(result.unwrap_or(Err(SheetGridError::Busy))?)
    }

    #[wasm_bindgen(js_name = "commitEdit")]
    pub fn commit_edit(&self) -> std::result::Result<(), JsValue> {
        let result = self.shared.with_grid(GridView::commit_edit);
        self.shared.sync();
        result.unwrap_or(Ok(None))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "cancelEdit")]
    pub fn cancel_edit(&self) -> bool {
        let cancelled = self.shared.with_grid(GridView::cancel_edit).unwrap_or(false);
        self.shared.sync();
        cancelled
    }

    #[wasm_bindgen(js_name = "editingCell")]
    pub fn editing_cell(&self) -> Option<String> {
        self.shared
            .read_grid(|g| g.editing_cell().map(str::to_string))
            .flatten()
    }

    // ------------------------------------------------------------------
    // Rows and bulk updates
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = "showAddRows")]
    pub fn show_add_rows(&self) -> bool {
        self.shared.read_grid(GridView::show_add_rows).unwrap_or(false)
    }

    /// Grow the sheet by one batch. Returns the number of rows added.
    #[wasm_bindgen(js_name = "addMoreRows")]
    pub fn add_more_rows(&self) -> u32 {
        let added = self.shared.with_grid(GridView::add_more_rows).unwrap_or(0);
        self.shared.sync();
        added
    }

    #[wasm_bindgen(js_name = "isBusy")]
    /// Also `true` while an outer call holds the grid.
    pub fn is_busy(&self) -> bool {
        self.shared.read_grid(GridView::is_busy).unwrap_or(true)
    }

    /// Send `updates` (`[{cellId, value}]`) through `bulkUpdateCells`.
    /// Input is blocked until the returned promise settles.
    #[wasm_bindgen(js_name = "bulkUpdate")]
    pub fn bulk_update(&self, updates: JsValue) -> std::result::Result<Promise, JsValue> {
        let updates: Vec<CellUpdate> = from_js(updates)?;
        let future = self.shared.try_read_grid(|g| g.bulk_update(updates))??;
        Ok(self.settle(future))
    }

    /// Sort used rows by column `letter`.
    #[wasm_bindgen(js_name = "sortColumn")]
    pub fn sort_column(&self, letter: &str, descending: bool) -> std::result::Result<Promise, JsValue> {
        let col = cell_ref::letters_to_col(letter)
            .ok_or_else(|| SheetGridError::CellRef(letter.to_string()))?;
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let future = self
            .shared
            .with_grid(|g| g.sort_column(col, direction))
            .unwrap_or(Err(SheetGridError::Busy))?;
        self.shared.sync();
        Ok(self.settle(future))
    }

    fn settle(&self, future: crate::collab::LocalBoxFuture<'static, Result<()>>) -> Promise {
        let shared = Rc::clone(&self.shared);
        future_to_promise(async move {
            let result = future.await;
            shared.request_render();
            result.map(|()| JsValue::UNDEFINED).map_err(JsValue::from)
        })
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = "selectionStats")]
    pub fn selection_stats(&self) -> std::result::Result<JsValue, JsValue> {
        let stats = self.shared.try_read_grid(GridView::selection_stats)?;
        Ok(to_js(&stats)?)
    }

    #[wasm_bindgen(js_name = "columnSchema")]
    pub fn column_schema(&self, letter: &str) -> std::result::Result<JsValue, JsValue> {
        let schema = self.shared.try_read_grid(|g| g.column_schema(letter))?;
        Ok(to_js(&schema)?)
    }

    pub fn report(&self) -> std::result::Result<JsValue, JsValue> {
        let report = self.shared.try_read_grid(GridView::report)?;
        Ok(to_js(&report)?)
    }
}

impl Drop for GridViewer {
    fn drop(&mut self) {
        if let Some(spacer) = &self.shared.spacer {
            spacer.remove();
        }
        log::info!("grid unmounted");
    }
}
