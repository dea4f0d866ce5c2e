use std::path::PathBuf;

/// Failures that happen before any remote folder is touched
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unable to read credentials from {path}")]
    ReadCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid service account credentials")]
    Credentials(#[source] tame_oauth::Error),
    #[error("failed to send token request")]
    TokenRequest(#[source] reqwest::Error),
    #[error("token request was rejected ({status}): {body}")]
    TokenRejected {
        status: http::StatusCode,
        body: String,
    },
    #[error("invalid token response")]
    TokenResponse(#[source] http::Error),
    #[error("failed to convert token to header value")]
    Token(#[source] tame_oauth::Error),
    #[error("invalid endpoint '{0}'")]
    Endpoint(String),
    #[error("failed to build client")]
    Client(#[source] reqwest::Error),
}

/// Failures of a listing or update call against the storage API
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to send request")]
    Request(#[from] reqwest::Error),
    #[error("request failed ({status}): {body}")]
    Status {
        status: http::StatusCode,
        body: String,
    },
    #[error("failed to deserialize body")]
    Decode(#[from] serde_json::Error),
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

/// Either the client could not be set up, or a remote call failed
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl Error {
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Remote(RemoteError::Output(err))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
