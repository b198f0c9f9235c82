/// Tag attribute validation failure.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Required attribute is absent.
    #[error("`{tag}` requires attribute `{attribute}`")]
    MissingAttribute { tag: String, attribute: String },
    /// Attribute has the wrong type or a value outside its allowed set.
    #[error("`{tag}` attribute `{attribute}`: {message}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        message: String,
    },
}

/// Highlighter stylesheet error.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Configured theme is not bundled.
    #[error("unknown highlighting theme `{0}`")]
    UnknownTheme(String),
    /// Theme could not be converted to CSS.
    #[error("highlighting error: {0}")]
    Syntect(#[from] syntect::Error),
}
