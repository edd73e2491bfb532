use thiserror::Error;

/// Failures while bringing a ripple layer up.
///
/// None of these reach the page: `RippleLayer::mount` logs them and hands back
/// an inert layer.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("no global window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("WebGL2 not supported")]
    ContextUnavailable,

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("uniform `{0}` not found in linked program")]
    MissingUniform(&'static str),

    #[error("DOM call failed: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for LayerError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        LayerError::Dom(msg)
    }
}

pub type LayerResult<T> = Result<T, LayerError>;
