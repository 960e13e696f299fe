//! Line charts through Chart.js, with one fixed look.
//!
//! The page must load Chart.js so that `Chart` is a global constructor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::Error;
use crate::interop;

#[wasm_bindgen]
extern "C" {
    /// A chart owned by Chart.js.
    #[derive(Clone, Debug)]
    pub type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(target: &JsValue, config: &JsValue) -> Result<Chart, JsValue>;

    /// Re-renders after the data arrays were mutated.
    #[wasm_bindgen(method)]
    pub fn update(this: &Chart);

    /// Releases the canvas so it can host another chart.
    #[wasm_bindgen(method)]
    pub fn destroy(this: &Chart);
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Index,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub interaction: Interaction,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Clone, Debug, Serialize)]
pub struct Interaction {
    pub mode: InteractionMode,
    pub intersect: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Clone, Debug, Serialize)]
pub struct Legend {
    pub display: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub grid: Grid,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Grid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            // tooltip lists every series at the hovered label
            interaction: Interaction {
                mode: InteractionMode::Index,
                intersect: false,
            },
            plugins: Plugins {
                legend: Legend { display: true },
            },
            scales: Scales {
                x: Axis {
                    begin_at_zero: None,
                    grid: Grid {
                        display: Some(false),
                        color: None,
                    },
                },
                y: Axis {
                    begin_at_zero: Some(true),
                    grid: Grid {
                        display: None,
                        color: Some("rgba(0,0,0,0.04)".to_string()),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartData<'a, L, D> {
    pub labels: &'a [L],
    pub datasets: &'a [D],
}

#[derive(Debug, Serialize)]
pub struct LineChartConfig<'a, L, D> {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData<'a, L, D>,
    pub options: ChartOptions,
}

impl<'a, L: Serialize, D: Serialize> LineChartConfig<'a, L, D> {
    pub fn new(labels: &'a [L], datasets: &'a [D]) -> Self {
        LineChartConfig {
            kind: ChartKind::Line,
            data: ChartData { labels, datasets },
            options: ChartOptions::default(),
        }
    }
}

/// A plain dataset. Any other `Serialize` type Chart.js understands works too;
/// `extra` carries keys this struct does not name.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LineDataset {
    pub fn new(label: &str, data: Vec<f64>) -> Self {
        LineDataset {
            label: label.to_string(),
            data,
            ..LineDataset::default()
        }
    }
}

/// Builds a line chart on `target`, or does nothing without one.
pub fn render_line_chart<L: Serialize, D: Serialize>(
    target: Option<&JsValue>,
    labels: &[L],
    datasets: &[D],
) -> Result<Option<Chart>, Error> {
    let Some(target) = target else {
        return Ok(None);
    };
    let config = interop::to_js(&LineChartConfig::new(labels, datasets))?;
    let chart = Chart::new(target, &config)?;
    tracing::debug!("line chart created with {} labels", labels.len());
    Ok(Some(chart))
}

/// Same as [`render_line_chart`] for values that are already JS objects.
///
/// `labels` and `datasets` are placed into the config as-is, so callbacks and
/// other non-JSON members survive.
pub fn render_line_chart_js(
    target: &JsValue,
    labels: &JsValue,
    datasets: &JsValue,
) -> Result<Option<Chart>, Error> {
    if target.is_falsy() {
        return Ok(None);
    }
    let data = js_sys::Object::new();
    js_sys::Reflect::set(&data, &JsValue::from_str("labels"), labels)?;
    js_sys::Reflect::set(&data, &JsValue::from_str("datasets"), datasets)?;

    let config = js_sys::Object::new();
    js_sys::Reflect::set(&config, &JsValue::from_str("type"), &JsValue::from_str("line"))?;
    js_sys::Reflect::set(&config, &JsValue::from_str("data"), &data)?;
    js_sys::Reflect::set(
        &config,
        &JsValue::from_str("options"),
        &interop::to_js(&ChartOptions::default())?,
    )?;

    let chart = Chart::new(target, &config)?;
    tracing::debug!("line chart created");
    Ok(Some(chart))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_render_without_target() {
    let _ = tracing_subscriber::fmt::try_init();

    let chart = render_line_chart(None, &["Mon", "Tue"], &[LineDataset::new("a", vec![1.0, 2.0])]);
    assert!(matches!(chart, Ok(None)));
}

#[test]
fn test_line_chart_config() {
    let datasets = [LineDataset::new("visits", vec![3.0, 5.0])];
    let config = LineChartConfig::new(&["Mon", "Tue"], &datasets);
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["type"], "line");
    assert_eq!(value["data"]["labels"], serde_json::json!(["Mon", "Tue"]));
    assert_eq!(value["options"]["scales"]["y"]["beginAtZero"], true);
    assert_eq!(
        value["data"]["datasets"],
        serde_json::json!([{ "label": "visits", "data": [3.0, 5.0] }])
    );
}

#[test]
fn test_chart_options() {
    let value = serde_json::to_value(ChartOptions::default()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "interaction": { "mode": "index", "intersect": false },
            "plugins": { "legend": { "display": true } },
            "scales": {
                "x": { "grid": { "display": false } },
                "y": { "beginAtZero": true, "grid": { "color": "rgba(0,0,0,0.04)" } }
            }
        })
    );
}

#[test]
fn test_dataset_extra_keys() {
    let mut dataset = LineDataset::new("load", vec![0.5]);
    dataset.tension = Some(0.3);
    dataset
        .extra
        .insert("pointRadius".to_string(), serde_json::json!(0));

    assert_eq!(
        serde_json::to_value(&dataset).unwrap(),
        serde_json::json!({ "label": "load", "data": [0.5], "tension": 0.3, "pointRadius": 0 })
    );
}

#[test]
fn test_opaque_datasets() {
    let datasets = [serde_json::json!({ "label": "raw", "data": [1, 2], "stepped": true })];
    let config = LineChartConfig::new(&[1, 2], &datasets);
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["data"]["datasets"][0]["stepped"], true);
    assert_eq!(value["data"]["labels"], serde_json::json!([1, 2]));
}
