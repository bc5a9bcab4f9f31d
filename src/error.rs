#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Serde failed: {}", .source)]
    SerdeJson {
        #[from]
        source: serde_json::Error,
    },
    #[error("Deserilaze failed: {}", .source)]
    SerdeYaml {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse url: {}", .source)]
    Url {
        #[from]
        source: url::ParseError,
    },
    #[error("Invalid utf8: {}", .source)]
    Utf8 {
        #[from]
        source: std::string::FromUtf8Error,
    },
    #[error("IO failure: {}", .source)]
    IO {
        #[from]
        source: std::io::Error,
    },
    /// Error returned when loading the configuration
    #[error("Failed to build config: {0}")]
    Config(String),
    /// A source snippet lacks a marker used to extract its fields
    #[error("Marker `{marker}` not found in {file}")]
    MissingMarker { file: String, marker: String },
    #[error("Type not found in catalog: {0}")]
    TypeNotFound(String),
    /// The base type chain never reaches a known root
    #[error("Cannot resolve type hierarchy of {0}")]
    UnresolvableTypeHierarchy(String),
    #[error("More than one source link in description: {0}")]
    AmbiguousSourceLink(String),
}
