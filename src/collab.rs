//! Contracts for the host-side collaborators the grid talks to.
//!
//! The grid never writes cells itself: edits go out through [`CellStore`], and the
//! host hands back a fresh sheet snapshot. Selection changes and growth requests
//! are plain notifications.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::{Result, SheetGridError};
use crate::types::{CellUpdate, CellValue};

/// A boxed, non-`Send` future (the grid lives on the UI thread).
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persists cell edits.
pub trait CellStore {
    /// Persist one edit. Fire-and-forget from the grid's perspective.
    fn update_cell(&self, cell_id: &str, value: &CellValue) -> Result<()>;

    /// Persist many edits as one unit. The grid stays busy until this resolves.
    fn bulk_update_cells(&self, updates: Vec<CellUpdate>) -> LocalBoxFuture<'_, Result<()>>;
}

/// Receives the selected ids after every selection-affecting event.
pub trait SelectionObserver {
    fn on_selection_change(&self, selected: &[String]);
}

/// Asked to grow the sheet when the user requests more rows.
pub trait RowGrowth {
    fn on_add_more_rows(&self);
}

/// Shared "bulk operation in flight" flag.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    /// Mark busy until the returned guard drops.
    pub fn acquire(&self) -> Result<BusyGuard> {
        if self.0.replace(true) {
            return Err(SheetGridError::Busy);
        }
        Ok(BusyGuard(Rc::clone(&self.0)))
    }
}

/// Clears the busy flag on drop, whatever the bulk operation's outcome.
#[derive(Debug)]
pub struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Run a bulk update while `guard` holds the busy flag.
pub async fn run_bulk_update(
    store: Rc<dyn CellStore>,
    guard: BusyGuard,
    updates: Vec<CellUpdate>,
) -> Result<()> {
    let _guard = guard;
    let count = updates.len();
    log::debug!("bulk update of {count} cells started");
    let result = store.bulk_update_cells(updates).await;
    match &result {
        Ok(()) => log::debug!("bulk update of {count} cells finished"),
        Err(e) => log::warn!("bulk update of {count} cells failed: {e}"),
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn guard_clears_flag_on_drop() {
        let flag = BusyFlag::default();
        let guard = flag.acquire().unwrap();
        assert!(flag.is_busy());
        assert!(matches!(flag.acquire(), Err(SheetGridError::Busy)));
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.acquire().is_ok());
    }
}
