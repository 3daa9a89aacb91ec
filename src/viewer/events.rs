//! DOM event subscriptions for `GridViewer`.
//!
//! Every listener is registered through a [`ListenerSet`] owned by the viewer and
//! removed when the viewer is dropped, so mounting and unmounting a grid many
//! times leaves nothing attached to the document.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, Node, WheelEvent};

use super::{px, Shared};
use crate::selection::Region;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Event listeners that are removed on drop.
#[derive(Default)]
pub(crate) struct ListenerSet {
    entries: Vec<Listener>,
}

impl ListenerSet {
    /// Subscribe `handler` to `kind` events of type `E` on `target`.
    ///
    /// Non-passive listeners may call `preventDefault`.
    pub(crate) fn listen<E, F>(&mut self, target: &EventTarget, kind: &'static str, passive: bool, mut handler: F)
    where
        E: JsCast + 'static,
        F: FnMut(&E) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if let Some(event) = event.dyn_ref::<E>() {
                handler(event);
            }
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            log::warn!("failed to add {kind} listener: {e:?}");
            return;
        }
        self.entries.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        for listener in self.entries.drain(..) {
            let _ = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.closure.as_ref().unchecked_ref());
        }
    }
}

/// Pointer position relative to the container's top-left corner.
fn local_point(container: &HtmlElement, event: &MouseEvent) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    (
        px(f64::from(event.client_x()) - rect.left()),
        px(f64::from(event.client_y()) - rect.top()),
    )
}

fn event_node(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

fn is_inside(container: &HtmlElement, event: &Event) -> bool {
    event_node(event).is_some_and(|node| container.contains(Some(&node)))
}

fn is_editor_input(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| el.has_attribute("data-grid-editor"))
}

/// Region of the page a pointer-down landed in, from the nearest
/// `data-grid-region` attribute (`toolbar`, `color-palette`, `ai-chat`).
fn region_of(event: &Event) -> Region {
    let region = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("[data-grid-region]").ok().flatten())
        .and_then(|el| el.get_attribute("data-grid-region"));
    match region.as_deref() {
        Some("toolbar") => Region::Toolbar,
        Some("color-palette") => Region::ColorPalette,
        Some("ai-chat") => Region::AiChat,
        _ => Region::Elsewhere,
    }
}

/// Wire all grid listeners for `shared`.
pub(crate) fn attach(shared: &Rc<Shared>) -> ListenerSet {
    let mut set = ListenerSet::default();
    let container = shared.container.clone();
    let container_target: &EventTarget = container.as_ref();

    {
        let shared = Rc::clone(shared);
        set.listen::<MouseEvent, _>(container_target, "mousedown", false, move |event| {
            if is_editor_input(event) {
                return;
            }
            let (x, y) = local_point(&shared.container, event);
            let shift = event.shift_key();
            let _ = shared.container.focus();
            if shared.with_grid(|g| g.on_mouse_down(x, y, shift)) == Some(true) {
                event.prevent_default();
            }
            shared.sync();
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<MouseEvent, _>(container_target, "mousemove", true, move |event| {
            let (x, y) = local_point(&shared.container, event);
            if shared.with_grid(|g| g.on_mouse_move(x, y)) == Some(true) {
                shared.sync();
            }
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<MouseEvent, _>(container_target, "dblclick", true, move |event| {
            let (x, y) = local_point(&shared.container, event);
            shared.with_grid(|g| g.on_double_click(x, y));
            shared.sync();
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<WheelEvent, _>(container_target, "wheel", false, move |event| {
            #[allow(clippy::cast_possible_truncation)]
            let (dx, dy) = (event.delta_x() as f32, event.delta_y() as f32);
            if shared.with_grid(|g| g.on_wheel(dx, dy)) == Some(true) {
                event.prevent_default();
                event.stop_propagation();
                shared.sync();
            }
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<Event, _>(container_target, "scroll", true, move |_event| {
            let (left, top) = shared.container_scroll();
            shared.with_grid(|g| g.on_scroll(left, top));
            shared.sync();
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<Event, _>(container_target, "input", true, move |event| {
            if !is_editor_input(event) {
                return;
            }
            if let Some(text) = shared.editor_value() {
                shared.with_grid(|g| g.set_edit_input(&text));
                shared.sync();
            }
        });
    }
    {
        let shared = Rc::clone(shared);
        // focusout bubbles where blur does not.
        set.listen::<Event, _>(container_target, "focusout", true, move |event| {
            if !is_editor_input(event) {
                return;
            }
            shared.with_grid(|g| g.on_blur());
            shared.sync();
        });
    }

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return set;
    };
    let document_target: &EventTarget = document.as_ref();
    {
        let shared = Rc::clone(shared);
        set.listen::<MouseEvent, _>(document_target, "mouseup", true, move |_event| {
            shared.with_grid(|g| g.on_mouse_up());
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<MouseEvent, _>(document_target, "mousedown", true, move |event| {
            if is_inside(&shared.container, event) {
                return;
            }
            let region = region_of(event);
            if shared.with_grid(|g| g.on_click_outside(region)) == Some(true) {
                shared.sync();
            }
        });
    }
    {
        let shared = Rc::clone(shared);
        set.listen::<KeyboardEvent, _>(document_target, "keydown", false, move |event| {
            // Keys belong to the grid only when focus is inside it or nowhere.
            let focused_body = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                .is_some_and(|el| el.tag_name().eq_ignore_ascii_case("body"));
            if !focused_body && !is_inside(&shared.container, event) {
                return;
            }
            let key = event.key();
            let ctrl = event.ctrl_key() || event.meta_key();
            let shift = event.shift_key();
            if shared.with_grid(|g| g.on_key_down(&key, shift, ctrl)) == Some(true) {
                event.prevent_default();
            }
            shared.sync();
        });
    }

    log::debug!("attached {} grid listeners", set.len());
    set
}
