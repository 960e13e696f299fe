use dioxus::prelude::*;
use serde_json::Value;

#[component]
pub fn FetchResult(result: Option<Result<Value, String>>) -> Element {
    let (tone, text) = match result {
        None => ("text-slate-400", "nothing fetched yet".to_owned()),
        Some(Ok(Value::Null)) => ("text-amber-600", "null (empty or non-JSON body)".to_owned()),
        Some(Ok(value)) => (
            "",
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| e.to_string()),
        ),
        Some(Err(e)) => ("text-red-600", format!("request failed: {e}")),
    };
    rsx! {
        div { class: "font-mono whitespace-pre ml-1 box-border {tone}", "{text}" }
    }
}
