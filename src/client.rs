//! A blocking client built on [ureq].

use tracing::{debug, warn};

use crate::{
    ApiError, ApiRequest, ApiResponse, CoordinateError, Coordinates, Profile, SedResponse,
    config, get_data::GetData,
};

/// Any error encountered while fetching SED data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The coordinates were rejected before sending anything.
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::Error),
    /// The request could not be built.
    #[error("Failed to build request")]
    Request(#[from] http::Error),
    /// The request failed in transport.
    #[error("HTTP error")]
    Http(#[from] ureq::Error),
    /// The response could not be read.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A client for the SED Builder service.
#[derive(Debug, Clone)]
pub struct Client {
    profile: Profile,
    agent: ureq::Agent,
}

impl Client {
    /// Create a client for the given profile.
    pub fn new(profile: Profile) -> Self {
        // Allows error responses to be parsed.
        let cfg = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(profile.timeout)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(cfg),
            profile,
        }
    }

    /// Create a client for the profile selected by the environment. See
    /// [Profile::from_default_env].
    pub fn from_default_env() -> Result<Self, Error> {
        Ok(Self::new(Profile::from_default_env()?))
    }

    /// The profile in use.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Send a request and read its response.
    pub fn roundtrip<T: ApiRequest>(&self, req: T) -> Result<T::Response, Error> {
        let req = req.into_request(&self.profile)?;
        debug!(uri = %req.uri(), "sending request");

        let resp = self.agent.run(req)?;
        debug!(status = %resp.status(), "received response");

        let resp = T::Response::from_response(resp.map(ureq::Body::into_reader))?;
        Ok(resp)
    }

    /// Retrieve SED data for a sky position, in degrees.
    ///
    /// Coordinates are validated before anything is sent; see
    /// [Coordinates::new].
    pub fn get_data(&self, ra: f64, dec: f64) -> Result<SedResponse, Error> {
        let coords = Coordinates::new(ra, dec)?;
        let sed = self.roundtrip(GetData { coords })?;

        if !sed.is_successful() {
            warn!(
                status = %sed.response_info.status_code,
                message = %sed.response_info.message.as_deref().unwrap_or_default(),
                "SED Builder reported an unsuccessful query"
            );
        }

        Ok(sed)
    }
}

/// Retrieve SED data for a sky position, in degrees, using the profile
/// selected by the environment.
///
/// ```no_run
/// # fn main() -> Result<(), sedbuilder::Error> {
/// let sed = sedbuilder::get_data(194.04625, -5.789167)?;
/// println!("{} data points", sed.points().count());
/// # Ok(())
/// # }
/// ```
pub fn get_data(ra: f64, dec: f64) -> Result<SedResponse, Error> {
    // Fail fast on bad input, before touching the config.
    Coordinates::new(ra, dec)?;
    Client::from_default_env()?.get_data(ra, dec)
}
