use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {var} is not set")]
    ConfigMissing { var: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("{}", describe_remote_failure(.status, .message))]
    RemoteCallFailed { status: Option<u16>, message: String },

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config_missing(var: &str) -> Self {
        Error::ConfigMissing {
            var: var.to_string(),
        }
    }

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::RemoteCallFailed {
            status,
            message: message.into(),
        }
    }

    /// Upstream HTTP status, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteCallFailed { status, .. } => *status,
            _ => None,
        }
    }
}

fn describe_remote_failure(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Error {}: {}", code, message),
        None => format!("Remote call failed: {}", message),
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}
