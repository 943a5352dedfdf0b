pub type TraceResult<T> = Result<T, TraceError>;

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    /// Path source or background image is missing or unreadable.
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// Input exists but cannot be decoded or yields nothing to draw with.
    #[error("malformed input: {0}")]
    InputMalformed(String),

    /// Non-positive speed or dash length, zero-sized viewport, etc.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TraceError {
    pub fn input_unavailable(msg: impl Into<String>) -> Self {
        Self::InputUnavailable(msg.into())
    }

    pub fn input_malformed(msg: impl Into<String>) -> Self {
        Self::InputMalformed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigurationInvalid(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}
