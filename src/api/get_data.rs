//! The `getData` operation: SED data points around a sky position.

use serde::Serialize;

use crate::{
    Coordinates, SedResponse,
    api::{ApiRequest, JsonResponse},
};

/// Retrieve SED data for a sky position.
///
/// ```
/// use sedbuilder::{ApiRequest, Coordinates, Profile, get_data::GetData};
///
/// # fn main() -> anyhow::Result<()> {
/// let req = GetData {
///     coords: Coordinates::new(194.04625, -5.789167)?,
/// };
///
/// let http_req = req.into_request(&Profile::default())?;
/// assert!(http_req.uri().to_string().contains("getData"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GetData {
    /// The position to query.
    pub coords: Coordinates,
}

#[derive(Debug, Serialize)]
struct GetDataQuery {
    ra: f64,
    dec: f64,
}

impl ApiRequest for GetData {
    type Response = SedResponse;

    fn path(&self) -> String {
        "/SED/api/v1/getData".to_owned()
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(GetDataQuery {
            ra: self.coords.ra(),
            dec: self.coords.dec(),
        })
    }
}

impl JsonResponse for SedResponse {}
