use thiserror::Error;

/// Everything that can go wrong during one upload → inference → overlay interaction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing API key: set {env} in the environment or `api_key` in the settings file")]
    CredentialMissing { env: &'static str },

    #[error("inference call failed: {0}")]
    InferenceCall(String),

    #[error("malformed prediction response: {0}")]
    MalformedPrediction(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("image processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        Error::InferenceCall(err.without_url().to_string())
    }
}

impl Error {
    /// Whether the app can keep serving further interactions after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CredentialMissing { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
