//! Transient notifications pinned to the bottom-right corner.
//!
//! A toast fades in shortly after it is appended, fades out and slides down
//! once its duration elapses, and is removed from the document after the
//! fade-out. The returned [`Toast`] can cut that short with
//! [`Toast::dismiss`]; dropping it leaves the schedule running.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::dom;
use crate::error::Error;

pub const DEFAULT_DURATION_MS: u32 = 2500;
pub const FADE_IN_DELAY_MS: u32 = 10;
pub const FADE_OUT_MS: u32 = 400;

const SHOWN_OPACITY: &str = "0.92";

const STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("right", "18px"),
    ("bottom", "18px"),
    ("padding", "10px 14px"),
    ("background", "#111"),
    ("color", "#fff"),
    ("border-radius", "8px"),
    ("z-index", "9999"),
    ("transition", "all .3s"),
    ("opacity", "0"),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastPhase {
    /// Attached, waiting for the fade-in.
    Entering,
    Shown,
    Leaving,
    Removed,
}

/// When each step of a toast happens, in milliseconds after it is shown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ToastTimeline {
    pub fade_in_at: u32,
    pub fade_out_at: u32,
    pub remove_at: u32,
}

impl ToastTimeline {
    pub fn new(duration_ms: u32) -> Self {
        // a fade-out scheduled ahead of the fade-in would be undone by it
        let fade_out_at = duration_ms.max(FADE_IN_DELAY_MS);
        ToastTimeline {
            fade_in_at: FADE_IN_DELAY_MS,
            fade_out_at,
            remove_at: fade_out_at.saturating_add(FADE_OUT_MS),
        }
    }

    pub fn phase_at(&self, elapsed_ms: u32) -> ToastPhase {
        if elapsed_ms < self.fade_in_at {
            ToastPhase::Entering
        } else if elapsed_ms < self.fade_out_at {
            ToastPhase::Shown
        } else if elapsed_ms < self.remove_at {
            ToastPhase::Leaving
        } else {
            ToastPhase::Removed
        }
    }

    pub fn is_attached_at(&self, elapsed_ms: u32) -> bool {
        self.phase_at(elapsed_ms) != ToastPhase::Removed
    }
}

/// Interprets a duration handed over from JS.
///
/// `None` falls back to `default_ms`; negative and NaN become zero and huge
/// values saturate.
pub fn duration_from_js(duration: Option<f64>, default_ms: u32) -> u32 {
    match duration {
        Some(ms) => ms as u32,
        None => default_ms,
    }
}

struct Inner {
    element: web_sys::HtmlElement,
    window: web_sys::Window,
    timers: RefCell<Vec<i32>>,
    removed: Cell<bool>,
}

impl Inner {
    fn restyle(&self, changes: &[(&str, &str)]) {
        let style = self.element.style();
        for (property, value) in changes {
            if let Err(e) = style.set_property(property, value) {
                tracing::warn!(
                    "failed to set toast {property} to {value:?}: {}",
                    crate::error::describe(&e)
                );
            }
        }
    }

    fn remove(&self) {
        if self.removed.replace(true) {
            return;
        }
        for id in self.timers.borrow_mut().drain(..) {
            dom::clear_timeout(&self.window, id);
        }
        self.element.remove();
    }
}

#[wasm_bindgen]
#[derive(Clone)]
pub struct Toast {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl Toast {
    /// Removes the toast now and cancels its pending steps.
    pub fn dismiss(&self) {
        if !self.inner.removed.get() {
            tracing::debug!("toast dismissed");
        }
        self.inner.remove();
    }

    #[wasm_bindgen(getter)]
    pub fn dismissed(&self) -> bool {
        self.inner.removed.get()
    }
}

/// Shows `message` for `duration_ms` milliseconds.
pub fn show(message: &str, duration_ms: u32) -> Result<Toast, Error> {
    let window = dom::window()?;
    let document = window.document().ok_or(Error::NoDocument)?;
    let body = dom::body(&document)?;

    let element: web_sys::HtmlElement = document.create_element("div")?.unchecked_into();
    element.set_text_content(Some(message));
    let style = element.style();
    for (property, value) in STYLE {
        style.set_property(property, value)?;
    }
    body.append_child(&element)?;

    let timeline = ToastTimeline::new(duration_ms);
    tracing::debug!("toast {message:?} shown, {timeline:?}");

    let inner = Rc::new(Inner {
        element,
        window: window.clone(),
        timers: RefCell::new(Vec::with_capacity(3)),
        removed: Cell::new(false),
    });

    let fade_in = {
        let inner = inner.clone();
        dom::set_timeout(&window, timeline.fade_in_at, move || {
            if !inner.removed.get() {
                inner.restyle(&[("opacity", SHOWN_OPACITY)]);
            }
        })?
    };
    let fade_out = {
        let inner = inner.clone();
        dom::set_timeout(&window, timeline.fade_out_at, move || {
            if !inner.removed.get() {
                inner.restyle(&[("opacity", "0"), ("transform", "translateY(10px)")]);
            }
        })?
    };
    let remove = {
        let inner = inner.clone();
        dom::set_timeout(&window, timeline.remove_at, move || inner.remove())?
    };
    inner.timers.borrow_mut().extend([fade_in, fade_out, remove]);

    Ok(Toast { inner })
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_default_timeline() {
    let timeline = ToastTimeline::new(DEFAULT_DURATION_MS);
    assert_eq!(
        timeline,
        ToastTimeline {
            fade_in_at: 10,
            fade_out_at: 2500,
            remove_at: 2900,
        }
    );

    assert!(timeline.is_attached_at(0));
    assert!(timeline.is_attached_at(2499));
    assert_eq!(timeline.phase_at(2499), ToastPhase::Shown);
    assert_eq!(timeline.phase_at(2500), ToastPhase::Leaving);
    assert!(!timeline.is_attached_at(2900));
}

#[test]
fn test_zero_duration_keeps_transitions() {
    let timeline = ToastTimeline::new(0);
    assert_eq!(timeline.phase_at(0), ToastPhase::Entering);
    assert_eq!(timeline.phase_at(10), ToastPhase::Leaving);
    assert!(timeline.fade_out_at >= timeline.fade_in_at);
    assert_eq!(timeline.fade_out_at, FADE_IN_DELAY_MS);
    assert_eq!(timeline.remove_at, 410);
    assert!(timeline.is_attached_at(409));
    assert!(!timeline.is_attached_at(timeline.remove_at));
}

#[test]
fn test_phases_are_monotonic() {
    for duration in [0, 5, 10, 11, 400, 2500, u32::MAX] {
        let timeline = ToastTimeline::new(duration);
        assert!(timeline.fade_in_at <= timeline.fade_out_at);
        assert!(timeline.fade_out_at <= timeline.remove_at);
    }
}

#[test]
fn test_duration_from_js() {
    assert_eq!(duration_from_js(None, 2500), 2500);
    assert_eq!(duration_from_js(Some(1000.0), 2500), 1000);
    assert_eq!(duration_from_js(Some(0.0), 2500), 0);
    assert_eq!(duration_from_js(Some(-5.0), 2500), 0);
    assert_eq!(duration_from_js(Some(f64::NAN), 2500), 0);
    assert_eq!(duration_from_js(Some(1e12), 2500), u32::MAX);
}
