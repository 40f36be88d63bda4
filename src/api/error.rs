/// An error reading a response from the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API responded with a non-200 status, and no readable payload.
    #[error("{0}")]
    Status(http::StatusCode),
    /// The API response did not match the expected schema.
    #[error("Invalid response ({status}): {source}")]
    InvalidResponse {
        /// The HTTP status on the overall response.
        status: http::StatusCode,
        /// The parse error, including the path to the offending field.
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

impl ApiError {
    /// The HTTP status of the response that failed.
    pub fn status(&self) -> http::StatusCode {
        match self {
            ApiError::Status(status) | ApiError::InvalidResponse { status, .. } => *status,
        }
    }

    /// For schema errors, the path to the field that failed to parse, e.g.
    /// `Catalogs[0].Catalog.ErrorRadius`.
    pub fn field_path(&self) -> Option<String> {
        match self {
            ApiError::InvalidResponse { source, .. } => Some(source.path().to_string()),
            ApiError::Status(_) => None,
        }
    }
}
