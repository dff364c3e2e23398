//! RAII event listener
//!
//! A `Closure` must outlive the listener it backs. Rather than `forget()`ing
//! it (which leaks and leaves the listener attached for the page lifetime),
//! [`EventListener`] owns the closure and removes the listener when dropped.
//!
//! ```ignore
//! let listener = EventListener::new(document.into(), "keydown", false, |event| { .. });
//! // Listener is removed here
//! drop(listener);
//! ```

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// An event listener that removes itself when dropped.
pub struct EventListener {
    target: web_sys::EventTarget,
    event_name: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    /// Attaches `callback` to `target`. With `capture` set, the listener runs
    /// during the capture phase.
    pub fn new(
        target: web_sys::EventTarget,
        event_name: &'static str,
        capture: bool,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let callback: Closure<dyn FnMut(web_sys::Event)> = Closure::wrap(Box::new(callback));

        let options = web_sys::AddEventListenerOptions::new();
        options.set_capture(capture);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_name,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .ok();

        Self {
            target,
            event_name,
            capture,
            callback,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        // Removal must match the capture flag used at registration
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event_name,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}
