//! Browser tests: `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use pagekit::config::ThemeConfig;
use pagekit::fetch::{self, FetchError, RequestOptions};
use pagekit::theme::{self, Theme};
use pagekit::{bindings, toast};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const UNRESOLVABLE: &str = "http://nonexistent.invalid/";

fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

fn document() -> web_sys::Document {
    window().document().unwrap()
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn divs_with_text(text: &str) -> usize {
    let divs = document().query_selector_all("body > div").unwrap();
    (0..divs.length())
        .filter_map(|i| divs.item(i))
        .filter(|node| node.text_content().as_deref() == Some(text))
        .count()
}

fn test_theme_config(name: &str) -> ThemeConfig {
    ThemeConfig {
        storage_key: format!("pagekit-{name}"),
        toggle_id: format!("pagekit-{name}-toggle"),
        dark_class: format!("pagekit-{name}"),
    }
}

#[wasm_bindgen_test]
async fn test_fetch_unresolvable_rejects() {
    assert!(bindings::fetch_json(UNRESOLVABLE.to_string(), JsValue::UNDEFINED)
        .await
        .is_err());

    let err = fetch::fetch_json_or_null(UNRESOLVABLE, &RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

#[wasm_bindgen_test]
async fn test_fetch_invalid_init_rejects() {
    // GET requests cannot carry a body; the browser refuses to build them
    let init = js_sys::JSON::parse(r#"{ "method": "GET", "body": "x" }"#).unwrap();
    assert!(
        bindings::fetch_json("data:application/json,1".to_string(), init)
            .await
            .is_err()
    );
}

#[wasm_bindgen_test]
async fn test_fetch_empty_body_is_null() {
    let value = bindings::fetch_json("data:application/json,".to_string(), JsValue::NULL)
        .await
        .unwrap();
    assert!(value.is_null());

    let value = fetch::fetch_json_or_null("data:application/json,", &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(value, serde_json::Value::Null);
}

#[wasm_bindgen_test]
async fn test_fetch_parses_like_response_json() {
    let url = "data:application/json,%7B%22b%22%3A1%2C%22a%22%3A2%7D".to_string();
    let value = bindings::fetch_json(url, JsValue::UNDEFINED).await.unwrap();
    let keys: Vec<String> = js_sys::Object::keys(value.unchecked_ref())
        .iter()
        .filter_map(|k| k.as_string())
        .collect();
    assert_eq!(keys, ["b", "a"]);

    let value = bindings::fetch_json("data:application/json,1e400".to_string(), JsValue::UNDEFINED)
        .await
        .unwrap();
    assert_eq!(value.as_f64(), Some(f64::INFINITY));

    let deep = format!("{}{}", "%5B".repeat(200), "%5D".repeat(200));
    let value = bindings::fetch_json(format!("data:application/json,{deep}"), JsValue::UNDEFINED)
        .await
        .unwrap();
    assert!(js_sys::Array::is_array(&value));
}

#[wasm_bindgen_test]
fn test_install_without_control() {
    let config = test_theme_config("missing");
    let storage = window().local_storage().unwrap().unwrap();
    storage.remove_item(&config.storage_key).unwrap();

    assert_eq!(theme::install(&config).unwrap(), None);
    assert_eq!(storage.get_item(&config.storage_key).unwrap(), None);
    assert!(!document()
        .body()
        .unwrap()
        .class_list()
        .contains(&config.dark_class));
}

#[wasm_bindgen_test]
fn test_install_twice_toggles_once() {
    let config = test_theme_config("twice");
    let storage = window().local_storage().unwrap().unwrap();
    storage.remove_item(&config.storage_key).unwrap();

    let body = document().body().unwrap();
    let control: web_sys::HtmlElement = document()
        .create_element("button")
        .unwrap()
        .unchecked_into();
    control.set_id(&config.toggle_id);
    body.append_child(&control).unwrap();

    assert_eq!(theme::install(&config).unwrap(), Some(Theme::Light));
    assert_eq!(theme::install(&config).unwrap(), Some(Theme::Light));

    control.click();
    assert!(body.class_list().contains(&config.dark_class));
    assert_eq!(
        storage.get_item(&config.storage_key).unwrap().as_deref(),
        Some("1")
    );

    control.remove();
    body.class_list().remove_1(&config.dark_class).unwrap();
    storage.remove_item(&config.storage_key).unwrap();
}

#[wasm_bindgen_test]
fn test_show_appends_message() {
    let toast = toast::show("Saved (web)", 60_000).unwrap();
    assert_eq!(divs_with_text("Saved (web)"), 1);
    assert!(!toast.dismissed());
    toast.dismiss();
}

#[wasm_bindgen_test]
fn test_dismiss_twice() {
    let toast = toast::show("Dismiss me", 60_000).unwrap();
    assert_eq!(divs_with_text("Dismiss me"), 1);

    toast.dismiss();
    toast.dismiss();
    assert!(toast.dismissed());
    assert_eq!(divs_with_text("Dismiss me"), 0);
}

#[wasm_bindgen_test]
async fn test_zero_duration_toast_is_removed() {
    let toast = toast::show("Blink (web)", 0).unwrap();
    assert_eq!(divs_with_text("Blink (web)"), 1);

    sleep(200).await;
    assert_eq!(divs_with_text("Blink (web)"), 1);

    sleep(300).await;
    assert_eq!(divs_with_text("Blink (web)"), 0);
    assert!(toast.dismissed());
}
