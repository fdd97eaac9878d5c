use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("please provide at least one valid service account or user account credential")]
    NoCredentials,
    #[error("credential file '{}' does not exist", .0.display())]
    MissingCredentialFile(PathBuf),
    #[error(transparent)]
    GcpAuth(#[from] gcp_auth::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("token endpoint responded with {status}: {message}")]
    TokenEndpoint { status: u16, message: String },
}
