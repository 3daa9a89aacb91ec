//! Collaborators backed by JavaScript callbacks.
//!
//! The host passes one object with these properties:
//!
//! ```javascript
//! {
//!   updateCell(cellId, value),          // required
//!   bulkUpdateCells(updates),           // required, may return a Promise
//!   onSelectionChange(selectedIds),     // optional
//!   onAddMoreRows(),                    // optional
//!   render(frame),                      // optional, called after state changes
//! }
//! ```

use std::cell::{Cell, RefCell};

use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::collab::{CellStore, LocalBoxFuture, RowGrowth, SelectionObserver};
use crate::error::{Result, SheetGridError};
use crate::types::{CellUpdate, CellValue};

/// Serialize for JS with plain objects instead of `Map`s.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| SheetGridError::Other(format!("Serialization error: {e}")))
}

fn js_error(e: &JsValue) -> SheetGridError {
    SheetGridError::Collaborator(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// Read an optional function property from the host object.
pub(crate) fn callback(host: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(host, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn required(host: &JsValue, name: &str) -> Result<Function> {
    callback(host, name)
        .ok_or_else(|| SheetGridError::Collaborator(format!("host is missing `{name}`")))
}

pub(crate) struct JsCellStore {
    update_cell: Function,
    bulk_update_cells: Function,
}

impl JsCellStore {
    pub(crate) fn from_host(host: &JsValue) -> Result<Self> {
        Ok(Self {
            update_cell: required(host, "updateCell")?,
            bulk_update_cells: required(host, "bulkUpdateCells")?,
        })
    }
}

impl CellStore for JsCellStore {
    fn update_cell(&self, cell_id: &str, value: &CellValue) -> Result<()> {
        self.update_cell
            .call2(&JsValue::NULL, &JsValue::from_str(cell_id), &to_js(value)?)
            .map(|_| ())
            .map_err(|e| js_error(&e))
    }

    fn bulk_update_cells(&self, updates: Vec<CellUpdate>) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let payload = to_js(&updates)?;
            let returned = self
                .bulk_update_cells
                .call1(&JsValue::NULL, &payload)
                .map_err(|e| js_error(&e))?;
            if let Ok(promise) = returned.dyn_into::<Promise>() {
                JsFuture::from(promise).await.map_err(|e| js_error(&e))?;
            }
            Ok(())
        })
    }
}

/// Notifications raised while the grid is borrowed, delivered after release.
///
/// Host callbacks may call back into the viewer, so they never run under the
/// grid's `RefCell` borrow.
#[derive(Default)]
pub(crate) struct Outbox {
    selection: RefCell<Option<Vec<String>>>,
    add_rows: Cell<bool>,
}

impl SelectionObserver for Outbox {
    fn on_selection_change(&self, selected: &[String]) {
        *self.selection.borrow_mut() = Some(selected.to_vec());
    }
}

impl RowGrowth for Outbox {
    fn on_add_more_rows(&self) {
        self.add_rows.set(true);
    }
}

/// Host callbacks for the outbox.
pub(crate) struct HostCallbacks {
    pub(crate) on_selection_change: Option<Function>,
    pub(crate) on_add_more_rows: Option<Function>,
    pub(crate) render: Option<Function>,
}

impl HostCallbacks {
    pub(crate) fn from_host(host: &JsValue) -> Self {
        Self {
            on_selection_change: callback(host, "onSelectionChange"),
            on_add_more_rows: callback(host, "onAddMoreRows"),
            render: callback(host, "render"),
        }
    }

    /// Deliver queued notifications.
    pub(crate) fn deliver(&self, outbox: &Outbox) {
        let selected = outbox.selection.borrow_mut().take();
        if let (Some(selected), Some(f)) = (selected, &self.on_selection_change) {
            let ids: Array = selected.iter().map(|id| JsValue::from_str(id)).collect();
            if let Err(e) = f.call1(&JsValue::NULL, &ids) {
                log::warn!("onSelectionChange threw: {e:?}");
            }
        }
        if outbox.add_rows.replace(false) {
            if let Some(f) = &self.on_add_more_rows {
                if let Err(e) = f.call0(&JsValue::NULL) {
                    log::warn!("onAddMoreRows threw: {e:?}");
                }
            }
        }
    }
}
