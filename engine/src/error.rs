use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("fileId is required")]
    MissingFileId,

    #[error("required element #{0} is missing from the page")]
    MissingElement(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("image load failed: {0}")]
    ImageLoad(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl AnnotatorError {
    /// Wraps a raw exception thrown by the browser.
    pub fn surface(value: JsValue) -> Self {
        AnnotatorError::Surface(describe_js(&value))
    }
}

impl From<AnnotatorError> for JsValue {
    fn from(err: AnnotatorError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
