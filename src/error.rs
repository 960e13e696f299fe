use wasm_bindgen::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no global `window`")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("javascript exception: {0}")]
    Js(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(describe(&value))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsError::new(&err.to_string()).into()
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

#[test]
fn test_error_display() {
    assert_eq!(Error::NoBody.to_string(), "document has no body");
    assert_eq!(
        Error::Js("boom".to_string()).to_string(),
        "javascript exception: boom"
    );

    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(Error::from(err)
        .to_string()
        .starts_with("invalid configuration: "));
}
