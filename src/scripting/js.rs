//! QuickJS evaluation harness.
//!
//! One heap per evaluation: create, evaluate a single source string,
//! destroy. Nothing is carried between calls.

use crate::config::JsConfig;
use crate::core::{ScriptError, ScriptResult};
use rquickjs::{CatchResultExt, CaughtError, Context, Runtime, Value};

/// Plain snapshot of an evaluation result, detached from the heap.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Anything without a scalar snapshot; carries the JS type name.
    Other(String),
}

impl JsValue {
    fn snapshot(value: &Value<'_>) -> Self {
        if value.is_undefined() {
            JsValue::Undefined
        } else if value.is_null() {
            JsValue::Null
        } else if let Some(b) = value.as_bool() {
            JsValue::Bool(b)
        } else if let Some(i) = value.as_int() {
            JsValue::Int(i64::from(i))
        } else if let Some(f) = value.as_float() {
            JsValue::Float(f)
        } else if let Some(s) = value.as_string().and_then(|s| s.to_string().ok()) {
            JsValue::String(s)
        } else {
            JsValue::Other(format!("{:?}", value.type_of()).to_lowercase())
        }
    }
}

/// An isolated QuickJS runtime and context. Dropping it frees the heap.
pub struct JsHeap {
    // Field order matters: the context must go before its runtime.
    context: Context,
    #[allow(dead_code)]
    runtime: Runtime,
}

impl JsHeap {
    pub fn new(config: &JsConfig) -> ScriptResult<Self> {
        let runtime = Runtime::new().map_err(|e| ScriptError::HeapCreation(e.to_string()))?;
        if let Some(limit) = config.memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(size) = config.max_stack_size {
            runtime.set_max_stack_size(size);
        }
        let context =
            Context::full(&runtime).map_err(|e| ScriptError::HeapCreation(e.to_string()))?;

        tracing::trace!(target: "js", "Created JS heap");
        Ok(Self { context, runtime })
    }

    /// Evaluate `source` as a global script and snapshot its completion value.
    pub fn eval(&self, source: &str) -> ScriptResult<JsValue> {
        self.context.with(|ctx| {
            let value: Value = ctx
                .eval(source)
                .catch(&ctx)
                .map_err(|e| match e {
                    CaughtError::Exception(ex) => ScriptError::Exception(ex.to_string()),
                    CaughtError::Value(v) => {
                        ScriptError::Exception(format!("{:?}", JsValue::snapshot(&v)))
                    }
                    CaughtError::Error(e) => ScriptError::Evaluation(e.to_string()),
                })?;
            Ok(JsValue::snapshot(&value))
        })
    }
}

impl Drop for JsHeap {
    fn drop(&mut self) {
        tracing::trace!(target: "js", "Destroyed JS heap");
    }
}

/// Create a heap, evaluate `source` once, destroy the heap.
///
/// The heap is released on both the success and the error path.
pub fn evaluate(source: &str, config: &JsConfig) -> ScriptResult<JsValue> {
    let heap = JsHeap::new(config)?;
    heap.eval(source)
}

/// Host-facing evaluation entry point.
///
/// Returns nothing: a failing script is logged and otherwise ignored, it
/// never takes the process down. Use [`evaluate`] to observe the outcome.
pub fn execute_js(source: &str) {
    match evaluate(source, &JsConfig::default()) {
        Ok(value) => tracing::debug!(target: "js", ?value, "Evaluated script"),
        Err(e) => tracing::warn!(target: "js", error = %e, "Script evaluation failed"),
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    /// Exposed to the page as `executeJS(source)`.
    #[wasm_bindgen(js_name = executeJS)]
    pub fn execute_js(source: &str) {
        super::execute_js(source);
    }
}
