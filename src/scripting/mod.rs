//! Embedded JavaScript harness (QuickJS via rquickjs).

pub mod js;

pub use js::{evaluate, execute_js, JsHeap, JsValue};
