#![allow(non_snake_case)]

use dioxus::prelude::*;
use tracing::Level;
use wasm_bindgen::prelude::*;

use pagekit::chart::{self, LineDataset};
use pagekit::fetch::{self, RequestOptions};
use pagekit::{theme, toast, Config};

mod fetch_result;

const DARK_CSS: &str = "body.dark { background: #18181b; color: #e4e4e7; }";

const LABELS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn main() {
    console_error_panic_hook::set_once();

    dioxus_logger::init(Level::INFO).expect("logger failed to init");

    launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(Config::default);
    let toggle_id = config.theme.toggle_id.clone();
    let duration_ms = config.toast.duration_ms;

    let mut pinned = use_signal(|| None::<toast::Toast>);
    let mut url = use_signal(|| "/get_progress/1".to_owned());
    let mut output = use_signal(|| None::<Result<serde_json::Value, String>>);

    use_effect(move || {
        match theme::install(&config.theme) {
            Ok(Some(theme)) => tracing::info!("theme toggle ready, starting {theme:?}"),
            Ok(None) => tracing::warn!("theme toggle missing"),
            Err(e) => tracing::error!("theme toggle failed: {e}"),
        }

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("chart"))
            .map(JsValue::from);
        let datasets = [
            LineDataset {
                border_color: Some("#2563eb".to_owned()),
                tension: Some(0.3),
                ..LineDataset::new("Answers", vec![3.0, 5.0, 4.0, 7.0, 6.0, 9.0, 8.0])
            },
            LineDataset {
                border_color: Some("#16a34a".to_owned()),
                ..LineDataset::new("Score", vec![1.0, 2.0, 2.0, 4.0, 5.0, 5.0, 7.0])
            },
        ];
        match chart::render_line_chart(canvas.as_ref(), LABELS, &datasets) {
            Ok(Some(_)) => tracing::info!("chart rendered"),
            Ok(None) => tracing::warn!("no #chart canvas"),
            Err(e) => tracing::error!("chart failed: {e}"),
        }
    });

    let notify = move |message: &str, ms: u32| match toast::show(message, ms) {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::error!("toast failed: {e}");
            None
        }
    };

    rsx! {
        style { {DARK_CSS} }
        main { class: "p-4 flex flex-col gap-4",
            div { class: "flex gap-2",
                button { id: "{toggle_id}", class: "h-12 px-4 bg-slate-100", "Toggle theme" }
                button {
                    class: "h-12 px-4 bg-slate-100",
                    onclick: move |_| {
                        notify("Saved", duration_ms);
                    },
                    "Toast"
                }
                button {
                    class: "h-12 px-4 bg-slate-100",
                    onclick: move |_| {
                        notify("Blink", 0);
                    },
                    "Toast (0 ms)"
                }
                button {
                    class: "h-12 px-4 bg-slate-100",
                    onclick: move |_| {
                        if let Some(old) = pinned.write().take() {
                            old.dismiss();
                        }
                        *pinned.write() = notify("Pinned for a minute", 60_000);
                    },
                    "Pin toast"
                }
                button {
                    class: "h-12 px-4 bg-slate-100",
                    onclick: move |_| {
                        if let Some(t) = pinned.write().take() {
                            t.dismiss();
                        }
                    },
                    "Dismiss"
                }
            }
            div { class: "h-64", canvas { id: "chart" } }
            div { class: "flex gap-2",
                input {
                    class: "h-12 flex-1 px-2 bg-white",
                    value: "{url}",
                    oninput: move |e: Event<FormData>| *url.write() = e.data.value(),
                }
                button {
                    class: "h-12 px-4 bg-slate-100",
                    onclick: move |_| async move {
                        let target = url.read().clone();
                        let result = fetch::fetch_json_or_null(&target, &RequestOptions::default())
                            .await
                            .map_err(|e| e.to_string());
                        tracing::info!("fetched {target}: {result:?}");
                        *output.write() = Some(result);
                    },
                    "Fetch"
                }
            }
            fetch_result::FetchResult { result: output.read().clone() }
        }
    }
}
