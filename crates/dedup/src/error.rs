use std::fmt;

#[derive(Debug)]
pub enum DedupError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty weights, etc.).
    ConfigValidation(String),
    /// Two sources in one config share a name.
    DuplicateSource(String),
    /// A source's record file could not be parsed.
    RecordParse { source: String, message: String },
}

impl fmt::Display for DedupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateSource(name) => write!(f, "duplicate source: '{name}'"),
            Self::RecordParse { source, message } => {
                write!(f, "source '{source}': cannot parse records: {message}")
            }
        }
    }
}

impl std::error::Error for DedupError {}
