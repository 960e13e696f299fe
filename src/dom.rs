use wasm_bindgen::prelude::*;

use crate::error::Error;

pub fn window() -> Result<web_sys::Window, Error> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<web_sys::Document, Error> {
    window()?.document().ok_or(Error::NoDocument)
}

pub fn body(document: &web_sys::Document) -> Result<web_sys::HtmlElement, Error> {
    document.body().ok_or(Error::NoBody)
}

/// Milliseconds as accepted by `setTimeout`, saturating at `i32::MAX`.
pub fn timeout_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Runs `f` once after `ms` milliseconds, returning the timer id.
///
/// The callback frees itself after running; a cleared timer leaks its closure.
pub fn set_timeout(
    window: &web_sys::Window,
    ms: u32,
    f: impl FnOnce() + 'static,
) -> Result<i32, Error> {
    let callback = Closure::once_into_js(f);
    Ok(window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        timeout_ms(ms),
    )?)
}

pub fn clear_timeout(window: &web_sys::Window, id: i32) {
    window.clear_timeout_with_handle(id);
}

#[test]
fn test_timeout_ms() {
    assert_eq!(timeout_ms(0), 0);
    assert_eq!(timeout_ms(2500), 2500);
    assert_eq!(timeout_ms(u32::MAX), i32::MAX);
}
