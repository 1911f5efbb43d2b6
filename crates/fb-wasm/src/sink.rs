//! `TemplateSink` backed by JavaScript callbacks.

use fb_core::error::SaveError;
use fb_core::template::{SaveRequest, SavedTemplate, TemplateSink};
use wasm_bindgen::JsValue;

pub struct CallbackSink {
    create: js_sys::Function,
    update: js_sys::Function,
}

impl CallbackSink {
    pub fn new(create: js_sys::Function, update: js_sys::Function) -> Self {
        Self { create, update }
    }
}

impl TemplateSink for CallbackSink {
    fn create(&mut self, request: &SaveRequest) -> Result<SavedTemplate, SaveError> {
        let body = request_arg(request)?;
        let result = self.create.call1(&JsValue::NULL, &body);
        saved_from(result)
    }

    fn update(&mut self, id: u64, request: &SaveRequest) -> Result<SavedTemplate, SaveError> {
        let id = js_id(id)?;
        let body = request_arg(request)?;
        let result = self.update.call2(&JsValue::NULL, &JsValue::from_f64(id), &body);
        saved_from(result)
    }
}

/// Largest integer a JavaScript number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Template ids travel to the callback as plain numbers, so ids past
/// `MAX_SAFE_INTEGER` are refused rather than rounded.
fn js_id(id: u64) -> Result<f64, SaveError> {
    if id > MAX_SAFE_INTEGER {
        return Err(SaveError::Sink(format!("template id {id} is out of range")));
    }
    Ok(id as f64)
}

fn request_arg(request: &SaveRequest) -> Result<JsValue, SaveError> {
    serde_json::to_string(request)
        .map(|json| JsValue::from_str(&json))
        .map_err(|e| SaveError::Sink(e.to_string()))
}

/// A thrown value becomes a sink error with its message; an empty message
/// is reported with the generic save failure text.
fn saved_from(result: Result<JsValue, JsValue>) -> Result<SavedTemplate, SaveError> {
    let value = result.map_err(|err| SaveError::Sink(js_message(&err)))?;
    let json = value.as_string().unwrap_or_default();
    serde_json::from_str(&json).map_err(|e| SaveError::Sink(format!("unexpected save response: {e}")))
}

fn js_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default()
}
