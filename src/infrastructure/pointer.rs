use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use crate::domain::logging::LogComponent;

/// Window-level mouse tracking for the duration of one drag.
///
/// Listeners live exactly as long as the capture value: dropping it (on
/// release or when the owning component is torn down) detaches them.
pub struct PointerCapture {
    _on_move: EventListener,
    _on_up: EventListener,
}

impl PointerCapture {
    /// Returns `None` outside a browser window.
    pub fn acquire<M, U>(mut on_move: M, mut on_up: U) -> Option<Self>
    where
        M: FnMut(&MouseEvent) + 'static,
        U: FnMut(&MouseEvent) + 'static,
    {
        let window = web_sys::window()?;
        let on_move = EventListener::new(&window, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                on_move(event);
            }
        });
        let on_up = EventListener::new(&window, "mouseup", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                on_up(event);
            }
        });
        crate::log_trace!(LogComponent::Infrastructure("Pointer"), "capture acquired");
        Some(Self { _on_move: on_move, _on_up: on_up })
    }

    /// Drop the capture after the current event dispatch finishes, so a
    /// listener never frees itself while running.
    pub fn release_deferred(self) {
        wasm_bindgen_futures::spawn_local(async move {
            drop(self);
            crate::log_trace!(LogComponent::Infrastructure("Pointer"), "capture released");
        });
    }
}
