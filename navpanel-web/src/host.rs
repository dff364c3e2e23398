use navpanel_common::{EventKind, Handler, ListenTarget, MountError, NavEvent, NavHost, Phase};
use wasm_bindgen::JsCast;

use crate::listener::EventListener;

/// [`NavHost`] backed by a browser document
#[derive(Clone)]
pub struct WebHost {
    document: web_sys::Document,
}

impl WebHost {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// Host for the current window's document, if there is one.
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }
}

/// Translate a DOM event into the controller's event shape.
fn translate(kind: EventKind, event: &web_sys::Event) -> Option<NavEvent<web_sys::Element>> {
    match kind {
        EventKind::Click => Some(NavEvent::Click {
            target: event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok()),
        }),
        EventKind::KeyDown => event
            .dyn_ref::<web_sys::KeyboardEvent>()
            .map(|event| NavEvent::KeyDown { key: event.key() }),
    }
}

impl NavHost for WebHost {
    type Element = web_sys::Element;
    type Listener = EventListener;

    fn query_selector(&self, selector: &str) -> Result<Option<web_sys::Element>, MountError> {
        self.document
            .query_selector(selector)
            .map_err(|err| MountError::InvalidSelector {
                selector: selector.to_string(),
                message: err
                    .as_string()
                    .unwrap_or_else(|| format!("{:?}", err)),
            })
    }

    fn contains(&self, ancestor: &web_sys::Element, node: &web_sys::Element) -> bool {
        let node: &web_sys::Node = node.as_ref();
        ancestor.contains(Some(node))
    }

    fn has_class(&self, element: &web_sys::Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_class(&self, element: &web_sys::Element, class: &str, present: bool) {
        let classes = element.class_list();
        let _ = if present {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
    }

    fn set_attribute(&self, element: &web_sys::Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn listen(
        &self,
        target: ListenTarget<'_, web_sys::Element>,
        kind: EventKind,
        phase: Phase,
        mut handler: Handler<web_sys::Element>,
    ) -> EventListener {
        let target: web_sys::EventTarget = match target {
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Element(element) => element.clone().into(),
        };

        EventListener::new(
            target,
            kind.as_str(),
            phase == Phase::Capture,
            move |event: web_sys::Event| {
                if let Some(event) = translate(kind, &event) {
                    handler(event);
                }
            },
        )
    }
}
