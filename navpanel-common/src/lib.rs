//! navpanel-common - Navigation panel toggle logic shared by every host
//!
//! Contains the open/closed state machine, its configuration, and the
//! controller that drives a [`NavHost`]. Nothing here touches the browser
//! directly; `navpanel-web` supplies the DOM-backed host.

mod config;
mod controller;
mod host;
mod nav_state;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{ConfigError, NavConfig};
pub use controller::{MountError, NavToggle, Trigger, ARIA_EXPANDED, ESCAPE_KEY};
pub use host::{EventKind, Handler, ListenTarget, NavEvent, NavHost, Phase};
pub use nav_state::NavState;
