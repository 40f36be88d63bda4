use std::io::Read;

use serde::{Serialize, de::DeserializeOwned};

use crate::Profile;

mod error;
pub mod get_data;

pub use error::*;

/// Implemented by types that can be sent as requests to the SED Builder API.
pub trait ApiRequest: Sized {
    /// The corresponding response type.
    type Response: ApiResponse;

    /// The path that the request should take, relative to the endpoint.
    fn path(&self) -> String;

    /// The method to use.
    fn method(&self) -> http::Method {
        http::Method::GET
    }

    /// The serializable query string.
    fn query(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// Consume the request and return an [http::Request] suitable for passing
    /// to your favorite HTTP client.
    fn into_request(self, profile: &Profile) -> Result<http::Request<String>, http::Error> {
        let method = self.method();
        let mut parts = profile.api_endpoint.clone().into_parts();

        // A deployment may live under a prefix, e.g. behind a proxy.
        let prefix = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path().trim_end_matches('/'))
            .unwrap_or_default();
        let mut path = format!("{prefix}{}", self.path());

        if let Some(qs) = self.query() {
            let qs =
                serde_qs::to_string(&qs).expect("query string serialization should be infallible");
            if !qs.is_empty() {
                path.push('?');
                path.push_str(&qs);
            }
        }

        parts.path_and_query = Some(path.parse()?);

        let uri = http::Uri::from_parts(parts)?;
        http::Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::USER_AGENT, &profile.user_agent)
            .body(String::new())
    }
}

/// Implemented by types that can be read as responses from the SED Builder
/// API.
pub trait ApiResponse: Sized {
    /// Read the response from an [http::Response] object.
    fn from_response(resp: http::Response<impl Read>) -> Result<Self, ApiError> {
        let (parts, body) = resp.into_parts();
        Self::from_response_parts(parts, body)
    }

    /// Read the response from pre-parsed parts. Useful for async HTTP clients
    /// where the body must be collected before parsing.
    fn from_response_parts(parts: http::response::Parts, body: impl Read)
    -> Result<Self, ApiError>;
}

/// A private trait for types that deserialize directly from the response
/// body.
pub(crate) trait JsonResponse: DeserializeOwned {}

impl<T: JsonResponse> ApiResponse for T {
    fn from_response_parts(
        parts: http::response::Parts,
        body: impl Read,
    ) -> Result<Self, ApiError> {
        let de = &mut serde_json::Deserializer::from_reader(body);
        match serde_path_to_error::deserialize(de) {
            Ok(v) => Ok(v),
            // Error pages (e.g. from a proxy) are not worth a parse error.
            Err(_) if !parts.status.is_success() => Err(ApiError::Status(parts.status)),
            Err(e) => {
                tracing::error!("Failed to parse API response: {e}");
                Err(ApiError::InvalidResponse {
                    status: parts.status,
                    source: e,
                })
            }
        }
    }
}
