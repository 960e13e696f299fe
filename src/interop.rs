use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::Error;

/// Converts a Rust value into a plain JS value by way of JSON.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, Error> {
    let s = serde_json::to_string(value)?;
    Ok(js_sys::JSON::parse(&s)?)
}

/// Reads a JS value as `T`. `null` and `undefined` yield `None`.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<Option<T>, Error> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let s: String = js_sys::JSON::stringify(value)?.into();
    Ok(Some(serde_json::from_str(&s)?))
}
