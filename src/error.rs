use thiserror::Error;

/// Rejected configuration values, reported by [`crate::config::RevealConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("zone {x0}..{x1} x {y0}..{y1} must be a non-empty rectangle inside [0,1]")]
    InvalidZone { x0: f32, x1: f32, y0: f32, y1: f32 },
    #[error("frame sequence needs at least one frame")]
    EmptySequence,
    #[error("frame index padding must be at least one digit")]
    ZeroPadding,
    #[error("{name} must be in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
}

#[derive(Debug, Error)]
pub enum RevealError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("WebGL2 not supported")]
    WebGl2Unsupported,
    #[error("failed to create {0}")]
    GlCreate(&'static str),
    #[error("vertex shader failed to compile: {0}")]
    VertexCompile(String),
    #[error("fragment shader failed to compile: {0}")]
    FragmentCompile(String),
    #[error("shader program failed to link: {0}")]
    Link(String),
    #[error("uniform `{0}` not found in compositor program")]
    MissingUniform(&'static str),
    #[error("frame {index} ({url}) failed to load: {reason}")]
    FrameLoad {
        index: usize,
        url: String,
        reason: String,
    },
    #[error("javascript error: {0}")]
    Js(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<wasm_bindgen::JsValue> for RevealError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        RevealError::Js(text)
    }
}

impl From<RevealError> for wasm_bindgen::JsValue {
    fn from(err: RevealError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
