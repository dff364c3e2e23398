//! Host abstraction the controller drives
//!
//! A host owns the real element tree. The controller only asks it to find
//! elements, test containment, flip a class, write an attribute, and register
//! listeners. Listener registrations come back as guards: dropping the guard
//! removes the listener.

use crate::MountError;

/// DOM event types the controller listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    /// DOM event name
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// Propagation phase a listener is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Bubble,
}

/// A host event translated into the shape the controller understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent<E> {
    /// A click. `target` is `None` when the event target is not an element.
    Click { target: Option<E> },
    KeyDown { key: String },
}

/// Where a listener is attached
#[derive(Debug)]
pub enum ListenTarget<'a, E> {
    Document,
    Element(&'a E),
}

pub type Handler<E> = Box<dyn FnMut(NavEvent<E>)>;

/// Element tree and event source the navigation controller runs against.
pub trait NavHost: 'static {
    type Element: Clone + 'static;
    /// Registration guard; the listener stays attached until this is dropped.
    type Listener: 'static;

    /// First element matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, MountError>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn set_class(&self, element: &Self::Element, class: &str, present: bool);

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn listen(
        &self,
        target: ListenTarget<'_, Self::Element>,
        kind: EventKind,
        phase: Phase,
        handler: Handler<Self::Element>,
    ) -> Self::Listener;
}
