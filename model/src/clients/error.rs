use crate::clients::{HttpStatusCode, StatusCode};
use snafu::Snafu;

/// The `Result` type returned by `clients`.
pub type Result<T> = std::result::Result<T, Error>;

/// The public error type returned by `clients`.
#[derive(Debug, Snafu)]
pub struct Error(InnerError);

/// The private error type returned by `clients`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub(crate) enum InnerError {
    #[snafu(display("Error initializing the Kubernetes client: {}", source))]
    Initialization { source: kube::Error },

    #[snafu(display("Unable to read kubeconfig: {}", source))]
    Kubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to {} {}: {}", method, what, source))]
    KubeApiCall {
        method: String,
        what: String,
        source: kube::Error,
    },

    #[snafu(display("Error converting {} to JSON: {}", what, source))]
    Serde {
        what: String,
        source: serde_json::Error,
    },

    #[snafu(display("{} was not found", what))]
    NotFound { what: String },
}

impl Error {
    /// An error equivalent to a `404` from the API server. Useful for clients that are not backed
    /// by `kube`.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Error(InnerError::NotFound { what: what.into() })
    }
}

impl HttpStatusCode for InnerError {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            InnerError::Initialization { .. }
            | InnerError::Kubeconfig { .. }
            | InnerError::Serde { .. } => None,
            InnerError::KubeApiCall { source: e, .. } => e.status_code(),
            InnerError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
        }
    }
}

impl HttpStatusCode for Error {
    fn status_code(&self) -> Option<StatusCode> {
        self.0.status_code()
    }
}
