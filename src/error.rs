use thiserror::Error;

/// Failures from platform glue and configuration. The frame loop itself has
/// no failing operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no global `window`")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("no body on document")]
    NoBody,
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("2d context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("js error: {0}")]
    Js(String),
    #[error("frame request failed: {0}")]
    Schedule(String),
    #[error("invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<wasm_bindgen::JsValue> for EngineError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        EngineError::Js(format!("{value:?}"))
    }
}

impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
