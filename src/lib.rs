//! Small browser helpers for server-rendered pages: a persisted dark-mode
//! switch, toast notifications, Chart.js line charts with house defaults,
//! and JSON fetching.
//!
//! Each helper is usable from Rust directly or from JS through the exports
//! in [`bindings`].

pub mod bindings;
pub mod chart;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod interop;
pub mod theme;
pub mod toast;

pub use config::Config;
pub use error::Error;
