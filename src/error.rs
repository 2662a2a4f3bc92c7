use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("invalid image name: {0:?}")]
    InvalidImageName(String),
    #[error("image tag {0} doesn't exist")]
    ImageTagNotFound(String),
    #[error("cannot parse duration {0:?}")]
    DurationParse(String),
    #[error("this command requires Docker Hub credentials to be set in your environment")]
    MissingCredentials,
    #[error("request to Docker Hub failed")]
    RemoteRequest(#[from] reqwest::Error),
    #[error("Docker Hub returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}
