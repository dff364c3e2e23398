//! navpanel-web - Browser binding for the navigation toggle
//!
//! Drives `navpanel-common`'s controller against the real DOM. With the
//! `autostart` feature the toggle mounts itself with the default config
//! when the wasm module loads; pages that need other selectors call
//! `NavToggleHandle.mount(json)` from JavaScript instead.

mod host;
mod listener;

pub use host::WebHost;
pub use listener::EventListener;

use navpanel_common::{ConfigError, MountError, NavConfig, NavToggle};
use thiserror::Error;
use tracing::debug;
use wasm_bindgen::prelude::*;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("No browser document available")]
    NoDocument,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mount(#[from] MountError),
}

/// Parse an optional JSON config; `None` means defaults.
pub fn parse_config(config_json: Option<&str>) -> Result<NavConfig, ConfigError> {
    match config_json {
        Some(json) => NavConfig::from_json(json),
        None => Ok(NavConfig::default()),
    }
}

/// Parse an optional JSON config, then mount against the current window's document.
///
/// The config is validated before the document is touched.
pub fn mount_with_json(config_json: Option<&str>) -> Result<NavToggle<WebHost>, WebError> {
    let config = parse_config(config_json)?;
    mount_document(&config)
}

/// Mount against the current window's document.
pub fn mount_document(config: &NavConfig) -> Result<NavToggle<WebHost>, WebError> {
    let host = WebHost::from_window().ok_or(WebError::NoDocument)?;
    Ok(NavToggle::mount(host, config)?)
}

#[cfg(all(target_arch = "wasm32", feature = "autostart"))]
thread_local! {
    /// Toggle mounted at module load, kept for the page lifetime
    static AUTOSTARTED: std::cell::RefCell<Option<NavToggle<WebHost>>> =
        const { std::cell::RefCell::new(None) };
}

#[cfg(all(target_arch = "wasm32", feature = "autostart"))]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    match mount_document(&NavConfig::default()) {
        Ok(nav) => AUTOSTARTED.with(|slot| *slot.borrow_mut() = Some(nav)),
        // Pages without a navigation toggle just stay inert
        Err(err) => debug!(%err, "Navigation toggle not mounted"),
    }
}

/// JavaScript handle to a mounted navigation toggle
#[wasm_bindgen]
pub struct NavToggleHandle {
    inner: NavToggle<WebHost>,
}

#[wasm_bindgen]
impl NavToggleHandle {
    /// Mount with an optional JSON config (`{"toggle_selector": .., "panel_selector": .., "open_class": ..}`).
    pub fn mount(config_json: Option<String>) -> Result<NavToggleHandle, JsValue> {
        let inner = mount_with_json(config_json.as_deref()).map_err(|e| {
            debug!(%e, "Navigation toggle not mounted");
            JsValue::from_str(&e.to_string())
        })?;
        Ok(Self { inner })
    }

    pub fn open(&self) -> bool {
        self.inner.open()
    }

    pub fn close(&self) -> bool {
        self.inner.close()
    }

    /// Returns whether the panel is open afterwards.
    pub fn toggle(&self) -> bool {
        self.inner.toggle().is_open()
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    pub fn unmount(self) {
        self.inner.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_defaults() {
        assert_eq!(parse_config(None).unwrap(), NavConfig::default());
    }

    #[test]
    fn test_parse_config_override() {
        let config = parse_config(Some(r#"{"open_class": "nav--open"}"#)).unwrap();
        assert_eq!(config.open_class, "nav--open");
        assert_eq!(config.panel_selector, NavConfig::default().panel_selector);
    }

    #[test]
    fn test_parse_config_rejects_invalid() {
        assert!(parse_config(Some(r#"{"open_class": ""}"#)).is_err());
        assert!(parse_config(Some("42")).is_err());
    }

    #[test]
    fn test_mount_with_bad_json_fails_before_document_lookup() {
        let err = mount_with_json(Some(r#"{"toggle_selector": ""}"#)).err();
        assert!(matches!(
            err,
            Some(WebError::Config(ConfigError::Invalid {
                field: "toggle_selector",
                ..
            }))
        ));

        let err = mount_with_json(Some("{not json")).err();
        assert!(matches!(err, Some(WebError::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn test_error_messages() {
        let err = WebError::from(MountError::ToggleNotFound("[data-nav-toggle]".to_string()));
        assert_eq!(err.to_string(), "Toggle control not found: [data-nav-toggle]");
        assert_eq!(
            WebError::NoDocument.to_string(),
            "No browser document available"
        );
    }
}
