use std::path::PathBuf;

use thiserror::Error;

use crate::restaurants::RestaurantBuilderError;

#[derive(Debug, Error)]
pub enum GetError {
    #[error("the request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the request failed with status code: {0}")]
    ResponseError(reqwest::StatusCode),
    #[error("the response body could not be read: {0}")]
    ResponseBodyError(#[source] reqwest::Error),
    #[error("unable to parse the response body: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("the feed contains no content blocks")]
    EmptyFeed,
    #[error("unable to translate response object: {0}")]
    TranslateError(#[from] RestaurantBuilderError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unable to build the maps SDK url: {0}")]
    InvalidSdkUrl(String),
    #[error("unable to serialize restaurant for the page: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("unable to write the page: {0}")]
    WriteError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum OutFileError {
    #[error("outfile {0} already exists and overwrite not specified")]
    AlreadyExists(PathBuf),
    #[error("outfile {0} is a directory")]
    IsDirectory(PathBuf),
    #[error("unable to inspect outfile {0}: {1}")]
    InspectError(PathBuf, #[source] std::io::Error),
    #[error("unable to write outfile {0}: {1}")]
    WriteError(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    OutFile(#[from] OutFileError),
    #[error("unable to get restaurants: {0}")]
    Get(#[from] GetError),
    #[error("unable to render page: {0}")]
    Render(#[from] RenderError),
}
