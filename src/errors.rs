use thiserror::Error;

pub type Result<T> = std::result::Result<T, PokedexError>;

#[derive(Error, Debug)]
pub enum PokedexError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("No catalog item with id {0}")]
    NotFound(u32),
    #[error("Parsing error: {0}")]
    Parse(String),
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for PokedexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<url::ParseError> for PokedexError {
    fn from(e: url::ParseError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for PokedexError {
    fn from(e: reqwest::Error) -> Self {
        // Bodies that arrive but don't match the schema are parse failures,
        // everything else on the wire is a network failure.
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl PokedexError {
    /// Wrap any error raised while reading or writing the store
    /// identified by `label`.
    pub fn storage(label: &str, reason: impl ToString) -> Self {
        Self::Storage(label.to_owned(), reason.to_string())
    }
}
