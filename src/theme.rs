//! Light/dark theme switch persisted in `localStorage`.
//!
//! The stored value is `"1"` for dark and `"0"` for light. Anything else,
//! including no value at all, reads as light.

use std::cell::Cell;
use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::config::ThemeConfig;
use crate::dom;
use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("1") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_stored(self) -> &'static str {
        match self {
            Theme::Light => "0",
            Theme::Dark => "1",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl From<bool> for Theme {
    fn from(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// String key/value storage for the preference.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// Whatever carries the visual dark state, usually `<body>`.
pub trait ThemeRoot {
    fn is_dark(&self) -> bool;
    fn set_dark(&mut self, dark: bool);
}

#[derive(Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`, or nothing when the browser refuses access
/// (e.g. storage disabled), in which case reads miss and writes are dropped.
pub struct LocalStorage(Option<web_sys::Storage>);

impl LocalStorage {
    pub fn open(window: &web_sys::Window) -> Self {
        match window.local_storage() {
            Ok(Some(storage)) => LocalStorage(Some(storage)),
            Ok(None) => {
                tracing::warn!("localStorage unavailable, theme will not persist");
                LocalStorage(None)
            }
            Err(e) => {
                tracing::warn!(
                    "localStorage unavailable, theme will not persist: {}",
                    crate::error::describe(&e)
                );
                LocalStorage(None)
            }
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match self.0 {
            Some(ref storage) => Ok(storage.set_item(key, value)?),
            None => Ok(()),
        }
    }
}

pub struct BodyClass {
    element: web_sys::Element,
    class: String,
}

impl BodyClass {
    pub fn new(element: web_sys::Element, class: &str) -> Self {
        BodyClass {
            element,
            class: class.to_string(),
        }
    }
}

impl ThemeRoot for BodyClass {
    fn is_dark(&self) -> bool {
        self.element.class_list().contains(&self.class)
    }

    fn set_dark(&mut self, dark: bool) {
        if let Err(e) = self
            .element
            .class_list()
            .toggle_with_force(&self.class, dark)
        {
            tracing::warn!(
                "failed to toggle class {:?}: {}",
                self.class,
                crate::error::describe(&e)
            );
        }
    }
}

pub struct ThemeToggle<S, R> {
    store: S,
    root: R,
    key: String,
}

impl<S: PreferenceStore, R: ThemeRoot> ThemeToggle<S, R> {
    pub fn new(store: S, root: R, key: &str) -> Self {
        ThemeToggle {
            store,
            root,
            key: key.to_string(),
        }
    }

    /// Applies the persisted theme and writes it back.
    pub fn init(&mut self) -> Theme {
        let theme = Theme::from_stored(self.store.get(&self.key).as_deref());
        self.set(theme);
        theme
    }

    /// Inverts whatever is currently applied.
    pub fn toggle(&mut self) -> Theme {
        let theme = self.current().toggled();
        self.set(theme);
        theme
    }

    pub fn current(&self) -> Theme {
        Theme::from(self.root.is_dark())
    }

    pub fn set(&mut self, theme: Theme) {
        self.root.set_dark(theme.is_dark());
        if let Err(e) = self.store.set(&self.key, theme.as_stored()) {
            tracing::warn!("failed to persist theme {theme:?}: {e}");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> &R {
        &self.root
    }
}

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// True for the first caller only.
fn claim_install() -> bool {
    INSTALLED.with(|installed| !installed.replace(true))
}

/// Wires the toggle control to `<body>`.
///
/// Returns `Ok(None)` and touches nothing when the control is missing. Only
/// the first successful call attaches a click handler; later calls report
/// the applied theme and leave the page alone.
pub fn install(config: &ThemeConfig) -> Result<Option<Theme>, Error> {
    let window = dom::window()?;
    let document = window.document().ok_or(Error::NoDocument)?;
    let Some(control) = document.get_element_by_id(&config.toggle_id) else {
        tracing::debug!("no #{} on page, theme toggle disabled", config.toggle_id);
        return Ok(None);
    };

    let body = dom::body(&document)?;
    if !claim_install() {
        let theme = Theme::from(BodyClass::new(body.into(), &config.dark_class).is_dark());
        tracing::debug!("theme toggle already installed, keeping {theme:?}");
        return Ok(Some(theme));
    }

    let mut toggle = ThemeToggle::new(
        LocalStorage::open(&window),
        BodyClass::new(body.into(), &config.dark_class),
        &config.storage_key,
    );
    let theme = toggle.init();
    tracing::info!("theme initialized: {theme:?}");

    let on_click = Closure::<dyn FnMut()>::new(move || {
        let theme = toggle.toggle();
        tracing::info!("theme toggled: {theme:?}");
    });
    control.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    Ok(Some(theme))
}

#[cfg(test)]
#[derive(Debug, Default)]
struct FakeRoot(bool);

#[cfg(test)]
impl ThemeRoot for FakeRoot {
    fn is_dark(&self) -> bool {
        self.0
    }

    fn set_dark(&mut self, dark: bool) {
        self.0 = dark;
    }
}

#[cfg(test)]
fn toggle_with(stored: Option<&str>) -> ThemeToggle<MemoryStore, FakeRoot> {
    let mut store = MemoryStore::default();
    if let Some(v) = stored {
        store.set("dark", v).unwrap();
    }
    ThemeToggle::new(store, FakeRoot::default(), "dark")
}

#[test]
fn test_theme_from_stored() {
    assert_eq!(Theme::from_stored(None), Theme::Light);
    assert_eq!(Theme::from_stored(Some("0")), Theme::Light);
    assert_eq!(Theme::from_stored(Some("1")), Theme::Dark);
    assert_eq!(Theme::from_stored(Some("true")), Theme::Light);
    assert_eq!(Theme::Dark.as_stored(), "1");
    assert_eq!(Theme::Light.as_stored(), "0");
}

#[test]
fn test_init_applies_stored_preference() {
    let _ = tracing_subscriber::fmt::try_init();

    for (stored, dark) in [(None, false), (Some("0"), false), (Some("1"), true)] {
        let mut toggle = toggle_with(stored);
        assert_eq!(toggle.init().is_dark(), dark);
        assert_eq!(toggle.root().is_dark(), dark);
    }
}

#[test]
fn test_init_writes_preference_back() {
    let mut toggle = toggle_with(None);
    toggle.init();
    assert_eq!(toggle.store().get("dark").as_deref(), Some("0"));
}

#[test]
fn test_toggle_parity() {
    let _ = tracing_subscriber::fmt::try_init();

    for stored in [None, Some("0"), Some("1")] {
        let mut toggle = toggle_with(stored);
        let initial = toggle.init();

        for clicks in 1..=6 {
            let theme = toggle.toggle();
            let expected = if clicks % 2 == 0 {
                initial
            } else {
                initial.toggled()
            };
            assert_eq!(theme, expected);
            assert_eq!(toggle.current(), expected);
            assert_eq!(
                toggle.store().get("dark").as_deref(),
                Some(expected.as_stored())
            );
        }
    }
}

#[test]
fn test_install_is_claimed_once() {
    assert!(claim_install());
    assert!(!claim_install());
    assert!(!claim_install());
}

#[test]
fn test_toggle_follows_applied_state() {
    let mut toggle = toggle_with(Some("1"));
    toggle.init();
    toggle.root.set_dark(false);
    assert_eq!(toggle.toggle(), Theme::Dark);
}
