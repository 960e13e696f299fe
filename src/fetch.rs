//! JSON over `fetch`.
//!
//! Failures come in two kinds that callers are expected to treat
//! differently. A request that never produced a response (bad options, DNS
//! failure, refused connection, CORS rejection) is an error the caller must
//! handle. A response whose body is empty or not JSON is only a missing
//! value: [`fetch_json_or_null`] turns it into `null`, [`fetch_json`] reports
//! it as [`FetchError::Decode`] or [`FetchError::Body`].
//!
//! The HTTP status is not inspected. An error page with a JSON body is
//! returned like any other body.

use std::collections::BTreeMap;

use gloo_net::http::{Method, Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid request method {0:?}")]
    Method(String),
    #[error("invalid request: {0}")]
    Request(#[source] gloo_net::Error),
    #[error("request failed: {0}")]
    Transport(#[source] gloo_net::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] gloo_net::Error),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// A response arrived but did not carry usable JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Body(_) | FetchError::Decode(_))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Cors,
    NoCors,
    SameOrigin,
}

impl From<Credentials> for web_sys::RequestCredentials {
    fn from(c: Credentials) -> Self {
        match c {
            Credentials::Omit => web_sys::RequestCredentials::Omit,
            Credentials::SameOrigin => web_sys::RequestCredentials::SameOrigin,
            Credentials::Include => web_sys::RequestCredentials::Include,
        }
    }
}

impl From<Mode> for web_sys::RequestMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Cors => web_sys::RequestMode::Cors,
            Mode::NoCors => web_sys::RequestMode::NoCors,
            Mode::SameOrigin => web_sys::RequestMode::SameOrigin,
        }
    }
}

/// Request settings for the Rust API.
///
/// Deserializes from the same object shape `fetch` takes, e.g.
/// `{ "method": "POST", "headers": { "Content-Type": "application/json" }, "body": "{}" }`.
/// JS callers of [`fetch_json_js`] skip this type and hand their init object
/// to the browser unchanged.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
    pub mode: Option<Mode>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            body: None,
            credentials: None,
            mode: None,
        }
    }
}

/// Methods `fetch` accepts in any case and sends upper-cased.
const NORMALIZED_METHODS: &[&str] = &["DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT"];

impl RequestOptions {
    pub fn post_json<T: serde::Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        Ok(RequestOptions {
            method: "POST".to_string(),
            headers: BTreeMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            body: Some(serde_json::to_string(body)?),
            ..RequestOptions::default()
        })
    }

    pub fn http_method(&self) -> Result<Method, FetchError> {
        let upper = self.method.to_ascii_uppercase();
        let name = if NORMALIZED_METHODS.contains(&upper.as_str()) {
            upper.as_str()
        } else {
            self.method.as_str()
        };
        Method::from_bytes(name.as_bytes()).map_err(|_| FetchError::Method(self.method.clone()))
    }

    fn build(&self, url: &str) -> Result<Request, FetchError> {
        let mut builder = RequestBuilder::new(url).method(self.http_method()?);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        if let Some(credentials) = self.credentials {
            builder = builder.credentials(credentials.into());
        }
        if let Some(mode) = self.mode {
            builder = builder.mode(mode.into());
        }
        match self.body {
            Some(ref body) => builder.body(body.as_str()),
            None => builder.build(),
        }
        .map_err(FetchError::Request)
    }
}

/// Parses a response body. Empty bodies are a decode error like any other.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    Ok(serde_json::from_str(body)?)
}

pub async fn fetch_json<T: DeserializeOwned>(
    url: &str,
    options: &RequestOptions,
) -> Result<T, FetchError> {
    let request = options.build(url)?;
    let response = request.send().await.map_err(FetchError::Transport)?;
    tracing::debug!("{} {url} -> {}", options.method, response.status());
    let body = response.text().await.map_err(FetchError::Body)?;
    decode(&body)
}

/// Like [`fetch_json`], but an unusable body resolves to `null`.
pub async fn fetch_json_or_null(url: &str, options: &RequestOptions) -> Result<Value, FetchError> {
    null_on_decode(fetch_json(url, options).await)
}

/// `fetch(url, init)` followed by `JSON.parse` of the body, for JS callers.
///
/// `init` reaches the browser untouched, so `Headers`, `FormData` bodies,
/// abort signals and every other option behave as with `fetch` itself. A
/// rejection from `fetch` is returned as the original JS error. A body that
/// cannot be read or parsed yields `null`. Parsing stays in JS so key order,
/// nesting depth and number handling match `Response.json()`.
pub async fn fetch_json_js(url: &str, init: &JsValue) -> Result<JsValue, JsValue> {
    let window = dom::window()?;
    let request = if init.is_null() || init.is_undefined() {
        web_sys::Request::new_with_str(url)?
    } else {
        web_sys::Request::new_with_str_and_init(url, init.unchecked_ref())?
    };
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .unchecked_into();
    tracing::debug!("{} {url} -> {}", request.method(), response.status());

    let text = match response.text() {
        Ok(promise) => JsFuture::from(promise).await.ok().and_then(|t| t.as_string()),
        Err(_) => None,
    };
    Ok(text
        .and_then(|t| js_sys::JSON::parse(&t).ok())
        .unwrap_or(JsValue::NULL))
}

fn null_on_decode(result: Result<Value, FetchError>) -> Result<Value, FetchError> {
    match result {
        Err(e) if e.is_decode() => {
            tracing::debug!("treating response as null: {e}");
            Ok(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_decode_object() {
    let value: Value = decode(r#"{"a":1}"#).unwrap();
    assert_eq!(value, serde_json::json!({ "a": 1 }));
}

#[test]
fn test_decode_typed() {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Progress {
        score: u32,
    }

    assert_eq!(
        decode::<Progress>(r#"{"score": 7}"#).unwrap(),
        Progress { score: 7 }
    );
    assert!(decode::<Progress>(r#"{"score": "high"}"#)
        .unwrap_err()
        .is_decode());
}

#[test]
fn test_empty_body_is_null() {
    let _ = tracing_subscriber::fmt::try_init();

    for body in ["", "   ", "<html>oops</html>", "{\"a\":"] {
        let err = decode::<Value>(body).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(null_on_decode(Err(err)).unwrap(), Value::Null);
    }
}

#[test]
fn test_null_body() {
    assert_eq!(decode::<Value>("null").unwrap(), Value::Null);
    assert_eq!(
        null_on_decode(Ok(serde_json::json!([1, 2]))).unwrap(),
        serde_json::json!([1, 2])
    );
}

#[test]
fn test_request_options() {
    let options: RequestOptions = serde_json::from_str(
        r#"{
            "method": "POST",
            "headers": { "Content-Type": "application/json" },
            "body": "{\"user_id\": 3}",
            "credentials": "same-origin",
            "cache": "no-store"
        }"#,
    )
    .unwrap();

    assert_eq!(options.http_method().unwrap(), Method::POST);
    assert_eq!(options.headers["Content-Type"], "application/json");
    assert_eq!(options.body.as_deref(), Some(r#"{"user_id": 3}"#));
    assert_eq!(options.credentials, Some(Credentials::SameOrigin));
    assert_eq!(options.mode, None);

    assert_eq!(
        serde_json::from_str::<RequestOptions>("{}").unwrap(),
        RequestOptions::default()
    );
}

#[test]
fn test_request_methods() {
    let method = |json: &str| {
        serde_json::from_str::<RequestOptions>(json)
            .unwrap()
            .http_method()
    };

    assert_eq!(method("{}").unwrap(), Method::GET);
    assert_eq!(method(r#"{ "method": "post" }"#).unwrap(), Method::POST);
    assert_eq!(method(r#"{ "method": "HEAD" }"#).unwrap(), Method::HEAD);
    assert_eq!(method(r#"{ "method": "options" }"#).unwrap(), Method::OPTIONS);
    assert_eq!(method(r#"{ "method": "PATCH" }"#).unwrap(), Method::PATCH);
    assert_eq!(method(r#"{ "method": "patch" }"#).unwrap().as_str(), "patch");
    assert!(matches!(
        method(r#"{ "method": "NOT A TOKEN" }"#),
        Err(FetchError::Method(m)) if m == "NOT A TOKEN"
    ));
}

#[test]
fn test_post_json() {
    let options = RequestOptions::post_json(&serde_json::json!({ "answer": "yes" })).unwrap();
    assert_eq!(options.method, "POST");
    assert_eq!(options.body.as_deref(), Some(r#"{"answer":"yes"}"#));
    assert_eq!(options.headers.len(), 1);
}
