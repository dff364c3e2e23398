//! Navigation toggle controller
//!
//! Binds a toggle control to a collapsible panel. The controller's
//! [`NavState`] is the source of truth; the panel's open class and the
//! toggle's `aria-expanded` attribute are rewritten from it on every
//! transition.
//!
//! While the panel is open the controller holds two document listeners
//! (capture-phase click for outside-click dismissal, keydown for Escape).
//! They are owned guards: closing drops them, which unregisters them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, warn};

use crate::host::{EventKind, ListenTarget, NavEvent, NavHost, Phase};
use crate::{ConfigError, NavConfig, NavState};

/// Key that dismisses an open panel
pub const ESCAPE_KEY: &str = "Escape";

/// Attribute on the toggle control mirroring the panel state
pub const ARIA_EXPANDED: &str = "aria-expanded";

/// Why a navigation toggle could not be mounted.
///
/// Callers at page level treat every variant as "stay inert".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("Toggle control not found: {0}")]
    ToggleNotFound(String),
    #[error("Navigation panel not found: {0}")]
    PanelNotFound(String),
    #[error("Invalid selector {selector}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What caused a state transition (for logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Panel was already marked open in the markup
    Mount,
    /// Toggle control was clicked
    Activation,
    /// Click landed outside both the panel and the toggle
    OutsideClick,
    Escape,
    /// Programmatic call on the handle
    Api,
}

/// Listeners held only while the panel is open
struct DismissListeners<H: NavHost> {
    _click: H::Listener,
    _keydown: H::Listener,
}

struct Controller<H: NavHost> {
    host: H,
    toggle: H::Element,
    panel: H::Element,
    open_class: String,
    state: NavState,
    dismiss: Option<DismissListeners<H>>,
    this: Weak<RefCell<Controller<H>>>,
}

impl<H: NavHost> Controller<H> {
    /// Returns true if the state changed.
    fn open(&mut self, trigger: Trigger) -> bool {
        if self.state.is_open() {
            return false;
        }
        self.state = NavState::Open;
        self.apply();
        self.dismiss = Some(self.subscribe_dismiss());
        debug!(?trigger, "Navigation opened");
        true
    }

    /// Returns true if the state changed.
    fn close(&mut self, trigger: Trigger) -> bool {
        if !self.state.is_open() {
            return false;
        }
        self.state = NavState::Closed;
        self.apply();
        self.dismiss = None;
        debug!(?trigger, "Navigation closed");
        true
    }

    fn activate(&mut self, trigger: Trigger) {
        match self.state {
            NavState::Open => self.close(trigger),
            NavState::Closed => self.open(trigger),
        };
    }

    /// Write the derived presentation for the current state.
    fn apply(&self) {
        self.host
            .set_class(&self.panel, &self.open_class, self.state.is_open());
        self.host
            .set_attribute(&self.toggle, ARIA_EXPANDED, self.state.aria_expanded());
    }

    fn on_document_click(&mut self, event: NavEvent<H::Element>) {
        let NavEvent::Click { target } = event else {
            return;
        };
        let inside = target.as_ref().is_some_and(|target| {
            self.host.contains(&self.panel, target) || self.host.contains(&self.toggle, target)
        });
        if !inside {
            self.close(Trigger::OutsideClick);
        }
    }

    fn on_keydown(&mut self, event: NavEvent<H::Element>) {
        if let NavEvent::KeyDown { key } = event {
            if key == ESCAPE_KEY {
                self.close(Trigger::Escape);
            }
        }
    }

    fn subscribe_dismiss(&self) -> DismissListeners<H> {
        let this = self.this.clone();
        let click = self.host.listen(
            ListenTarget::Document,
            EventKind::Click,
            // Capture so bubbling handlers that stop propagation can't hide the click
            Phase::Capture,
            Box::new(move |event: NavEvent<H::Element>| {
                with_controller(&this, |c| c.on_document_click(event))
            }),
        );

        let this = self.this.clone();
        let keydown = self.host.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            Phase::Bubble,
            Box::new(move |event: NavEvent<H::Element>| {
                with_controller(&this, |c| c.on_keydown(event))
            }),
        );

        DismissListeners {
            _click: click,
            _keydown: keydown,
        }
    }
}

/// Run `f` against the controller if it is still mounted and not already borrowed.
fn with_controller<H: NavHost>(
    this: &Weak<RefCell<Controller<H>>>,
    f: impl FnOnce(&mut Controller<H>),
) {
    let Some(controller) = this.upgrade() else {
        return;
    };
    let Ok(mut guard) = controller.try_borrow_mut() else {
        warn!("Navigation controller busy, dropping re-entrant event");
        return;
    };
    f(&mut guard);
}

/// A mounted navigation toggle.
///
/// Holds the toggle control's activation listener for as long as it lives.
/// Dropping it (or calling [`NavToggle::unmount`]) releases every listener;
/// the DOM keeps whatever class and `aria-expanded` value were last written.
pub struct NavToggle<H: NavHost> {
    controller: Rc<RefCell<Controller<H>>>,
    _activation: H::Listener,
}

impl<H: NavHost> NavToggle<H> {
    /// Locate the toggle control and panel and start listening.
    ///
    /// Registers nothing if either element is missing. The panel's current
    /// open class seeds the initial state, and `aria-expanded` is synced to it.
    pub fn mount(host: H, config: &NavConfig) -> Result<Self, MountError> {
        config.validate()?;

        let toggle = host
            .query_selector(&config.toggle_selector)?
            .ok_or_else(|| MountError::ToggleNotFound(config.toggle_selector.clone()))?;
        let panel = host
            .query_selector(&config.panel_selector)?
            .ok_or_else(|| MountError::PanelNotFound(config.panel_selector.clone()))?;

        let initial = if host.has_class(&panel, &config.open_class) {
            NavState::Open
        } else {
            NavState::Closed
        };

        let controller = Rc::new_cyclic(|this| {
            RefCell::new(Controller {
                host,
                toggle,
                panel,
                open_class: config.open_class.clone(),
                state: NavState::Closed,
                dismiss: None,
                this: this.clone(),
            })
        });

        let activation = {
            let this = Rc::downgrade(&controller);
            let inner = controller.borrow();
            inner.host.listen(
                ListenTarget::Element(&inner.toggle),
                EventKind::Click,
                Phase::Bubble,
                Box::new(move |_: NavEvent<H::Element>| {
                    with_controller(&this, |c| c.activate(Trigger::Activation))
                }),
            )
        };

        {
            let mut inner = controller.borrow_mut();
            match initial {
                NavState::Open => {
                    inner.open(Trigger::Mount);
                }
                NavState::Closed => inner.apply(),
            }
        }

        debug!(
            toggle = %config.toggle_selector,
            panel = %config.panel_selector,
            state = ?initial,
            "Navigation toggle mounted"
        );

        Ok(Self {
            controller,
            _activation: activation,
        })
    }

    pub fn state(&self) -> NavState {
        self.controller.borrow().state
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Open the panel. Returns false if it was already open.
    pub fn open(&self) -> bool {
        self.controller.borrow_mut().open(Trigger::Api)
    }

    /// Close the panel. Returns false if it was already closed.
    pub fn close(&self) -> bool {
        self.controller.borrow_mut().close(Trigger::Api)
    }

    /// Flip the panel, same as activating the toggle control. Returns the new state.
    pub fn toggle(&self) -> NavState {
        let mut inner = self.controller.borrow_mut();
        inner.activate(Trigger::Api);
        inner.state
    }

    /// Release all listeners.
    pub fn unmount(self) {
        debug!(state = ?self.state(), "Navigation toggle unmounted");
    }
}
