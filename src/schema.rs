//! Types for the JSON documents returned by the SED Builder service.

use std::{fs::File, io, path::Path};

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

/// An error reading a saved response from disk.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("Failed to read response file")]
    Io(#[from] io::Error),
    /// The document did not match the response schema.
    #[error("Invalid response: {0}")]
    Invalid(#[from] serde_path_to_error::Error<serde_json::Error>),
}

/// Response status information.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResponseInfo {
    /// Status code of the response (e.g. `OK` or `ERROR`).
    #[serde(rename = "statusCode")]
    pub status_code: String,
    /// Additional information, usually set on errors.
    #[serde(default)]
    pub message: Option<String>,
}

/// Additional properties for the queried position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Properties {
    /// Hydrogen column density along the line of sight, in cm^-2.
    #[serde(rename = "Nh", deserialize_with = "non_negative")]
    pub nh: f64,
}

/// Catalog metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catalog {
    /// Name of the catalog.
    pub catalog_name: String,
    /// Search radius used for source matching, in arcsec.
    #[serde(deserialize_with = "non_negative")]
    pub error_radius: f64,
}

/// A single SED data point, as reported by one catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceData {
    /// Frequency of the observation in Hz. Always positive.
    pub frequency: f64,
    /// Spectral flux density (nu F_nu) in erg/cm^2/s.
    pub nufnu: f64,
    /// Error on frequency in Hz.
    pub frequency_error: f64,
    /// Error on spectral flux density in erg/cm^2/s.
    pub nufnu_error: f64,
    /// Source name in the catalog, empty if not reported.
    pub name: String,
    /// Angular distance from the query position in arcsec.
    pub angular_distance: Option<f64>,
    /// Start of the observation, in MJD.
    pub start_time: Option<f64>,
    /// End of the observation, in MJD.
    pub stop_time: Option<f64>,
    /// Information flag (e.g. 'Upper Limit' or quality notes), empty if not
    /// reported.
    pub info: String,
}

/// One element of a catalog's `SourceData` list.
///
/// The service currently strips the numeric values from entries tagged with
/// warnings. Such entries, and any other entry that does not form a valid
/// data point, are kept as [`Measurement::Flagged`] instead of failing the
/// whole response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurement {
    /// A complete data point.
    Point(SourceData),
    /// An entry without usable data.
    Flagged {
        /// The information flag, if any.
        #[serde(rename = "Info")]
        info: Option<String>,
    },
}

impl Measurement {
    /// The data point, unless this entry was flagged.
    pub fn as_point(&self) -> Option<&SourceData> {
        match self {
            Measurement::Point(p) => Some(p),
            Measurement::Flagged { .. } => None,
        }
    }
}

/// A field of a `SourceData` entry, read without failing on a wrong type.
#[derive(Debug, Clone)]
enum Lenient<T> {
    Missing,
    Valid(T),
    Invalid,
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Missing
    }
}

impl<T> Lenient<T> {
    fn required(self) -> Option<T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Missing | Lenient::Invalid => None,
        }
    }

    /// `None` if the field has the wrong type, `Some(None)` if it is absent.
    fn optional(self) -> Option<Option<T>> {
        match self {
            Lenient::Missing => Some(None),
            Lenient::Valid(v) => Some(Some(v)),
            Lenient::Invalid => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Lenient::Missing);
        }

        Ok(serde_json::from_value(value).map_or(Lenient::Invalid, Lenient::Valid))
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawMeasurement {
    frequency: Lenient<f64>,
    nufnu: Lenient<f64>,
    frequency_error: Lenient<f64>,
    nufnu_error: Lenient<f64>,
    name: Lenient<String>,
    angular_distance: Lenient<f64>,
    start_time: Lenient<f64>,
    stop_time: Lenient<f64>,
    info: Lenient<String>,
}

impl RawMeasurement {
    fn into_point(self) -> Option<SourceData> {
        Some(SourceData {
            frequency: self.frequency.required()?,
            nufnu: self.nufnu.required()?,
            frequency_error: self.frequency_error.required()?,
            nufnu_error: self.nufnu_error.required()?,
            name: self.name.optional()?.unwrap_or_default(),
            angular_distance: self.angular_distance.optional()?,
            start_time: self.start_time.optional()?,
            stop_time: self.stop_time.optional()?,
            info: self.info.optional()?.unwrap_or_default(),
        })
    }
}

impl SourceData {
    fn in_range(&self) -> bool {
        self.frequency > 0.0
            && self.frequency_error >= 0.0
            && [self.angular_distance, self.start_time, self.stop_time]
                .iter()
                .all(|v| v.is_none_or(|v| v >= 0.0))
    }
}

impl From<RawMeasurement> for Measurement {
    fn from(raw: RawMeasurement) -> Self {
        let info = raw.info.clone().optional().flatten();

        let Some(point) = raw.into_point() else {
            return Measurement::Flagged { info };
        };

        if !point.in_range() {
            tracing::debug!(frequency = point.frequency, ?info, "data point out of range, keeping as flagged");
            return Measurement::Flagged { info };
        }

        Measurement::Point(point)
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawMeasurement::deserialize(deserializer).map(Into::into)
    }
}

/// A catalog with the measurements it contributed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEntry {
    /// Metadata about the catalog.
    pub catalog: Catalog,
    /// Measurements from this catalog.
    pub source_data: Vec<Measurement>,
}

impl CatalogEntry {
    /// Iterate over the complete data points, skipping flagged entries.
    pub fn points(&self) -> impl Iterator<Item = &SourceData> {
        self.source_data.iter().filter_map(Measurement::as_point)
    }
}

/// A complete SED Builder response.
///
/// Use [`SedResponse::to_record_batch`] for a table with units, or
/// [`SedResponse::to_value`] and [`SedResponse::to_json`] for the raw
/// document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SedResponse {
    /// Status information about the response.
    pub response_info: ResponseInfo,
    /// Additional properties for the queried position.
    pub properties: Properties,
    /// Catalog entries with measurements.
    pub catalogs: Vec<CatalogEntry>,
}

impl SedResponse {
    /// Whether the service reported success (`statusCode` is `OK`).
    pub fn is_successful(&self) -> bool {
        self.response_info.status_code == "OK"
    }

    /// Iterate over every complete data point, along with its catalog.
    pub fn points(&self) -> impl Iterator<Item = (&Catalog, &SourceData)> {
        self.catalogs
            .iter()
            .flat_map(|entry| entry.points().map(move |p| (&entry.catalog, p)))
    }

    /// Parse a response from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ParseError> {
        let de = &mut serde_json::Deserializer::from_str(s);
        Ok(serde_path_to_error::deserialize(de)?)
    }

    /// Parse a response from a reader.
    pub fn from_json_reader(r: impl io::Read) -> Result<Self, ParseError> {
        let de = &mut serde_json::Deserializer::from_reader(r);
        Ok(serde_path_to_error::deserialize(de)?)
    }

    /// Parse a response previously saved to disk, e.g. with
    /// `sedbuilder get --save`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Self::from_json_reader(io::BufReader::new(file))
    }
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative value, got {v}"
        )))
    }
}
