//! What the host page sees.
//!
//! ```js
//! import init, { initPage, toast, renderLineChart, fetchJson } from "./pagekit.js";
//! await init();
//! initPage({ theme: { toggleId: "darkToggle" } });
//! toast("Saved");
//! renderLineChart(document.getElementById("chart"), ["Mon", "Tue"], [{ label: "a", data: [1, 2] }]);
//! const progress = await fetchJson("/get_progress/1");
//! ```

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::chart::{self, Chart};
use crate::config::Config;
use crate::fetch;
use crate::toast::{self, Toast};
use crate::{dom, theme};

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// Applies `options` (see [`Config`]), starts logging and wires the theme
/// toggle. Returns whether a toggle control was found.
#[wasm_bindgen(js_name = initPage)]
pub fn init_page(options: JsValue) -> Result<bool, JsValue> {
    console_error_panic_hook::set_once();

    let config = Config::from_js(&options)?;
    if dioxus_logger::init(config.level()).is_err() {
        tracing::debug!("logger already initialized");
    }
    tracing::info!("pagekit initialized: {config:?}");

    let installed = theme::install(&config.theme)?.is_some();
    CONFIG.with(|c| *c.borrow_mut() = config);
    Ok(installed)
}

#[wasm_bindgen(js_name = toast)]
pub fn show_toast(message: &str, duration: Option<f64>) -> Result<Toast, JsValue> {
    let default_ms = CONFIG.with(|c| c.borrow().toast.duration_ms);
    Ok(toast::show(message, toast::duration_from_js(duration, default_ms))?)
}

/// Returns `undefined` when `ctx` is falsy.
#[wasm_bindgen(js_name = renderLineChart)]
pub fn render_line_chart(
    ctx: JsValue,
    labels: JsValue,
    datasets: JsValue,
) -> Result<Option<Chart>, JsValue> {
    Ok(chart::render_line_chart_js(&ctx, &labels, &datasets)?)
}

/// Resolves to the parsed body, or `null` when the body is empty or not
/// JSON. Rejects with the error `fetch` rejected with when no response could
/// be obtained. `options` is passed to `fetch` as is.
#[wasm_bindgen(js_name = fetchJson)]
pub async fn fetch_json(url: String, options: JsValue) -> Result<JsValue, JsValue> {
    fetch::fetch_json_js(&url, &options).await
}

/// Also publishes `toast`, `renderLineChart` and `fetchJson` on `window`,
/// for inline scripts that cannot import the module.
#[wasm_bindgen(js_name = installGlobals)]
pub fn install_globals() -> Result<(), JsValue> {
    let window = dom::window()?;

    let toast = Closure::<dyn Fn(String, Option<f64>) -> Result<JsValue, JsValue>>::new(
        |message: String, duration: Option<f64>| show_toast(&message, duration).map(JsValue::from),
    );
    let render = Closure::<dyn Fn(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
        |ctx: JsValue, labels: JsValue, datasets: JsValue| {
            Ok(render_line_chart(ctx, labels, datasets)?.map_or(JsValue::UNDEFINED, JsValue::from))
        },
    );
    let fetch = Closure::<dyn Fn(String, JsValue) -> js_sys::Promise>::new(
        |url: String, options: JsValue| {
            wasm_bindgen_futures::future_to_promise(fetch_json(url, options))
        },
    );

    js_sys::Reflect::set(&window, &JsValue::from_str("toast"), toast.as_ref())?;
    js_sys::Reflect::set(&window, &JsValue::from_str("renderLineChart"), render.as_ref())?;
    js_sys::Reflect::set(&window, &JsValue::from_str("fetchJson"), fetch.as_ref())?;
    toast.forget();
    render.forget();
    fetch.forget();

    tracing::debug!("globals installed");
    Ok(())
}
