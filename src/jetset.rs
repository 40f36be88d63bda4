//! Export to the data format read by [Jetset](https://jetset.readthedocs.io)'s
//! `jetset.data_loader.Data`.
//!
//! ```
//! use sedbuilder::{SedResponse, jetset::JetsetOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let sed = SedResponse::from_json_str(
//!     r#"{"ResponseInfo": {"statusCode": "OK"}, "Properties": {"Nh": 0}, "Catalogs": []}"#,
//! )?;
//!
//! let table = sed.to_jetset(&JetsetOptions::new(0.034))?;
//! assert_eq!(table.schema().metadata()["z"], "0.034");
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
};

use crate::{
    SedResponse,
    table::{UNIT_KEY, units},
};

/// An error building a Jetset table.
#[derive(Debug, thiserror::Error)]
pub enum JetsetError {
    /// The redshift is outside `[0, 1]`.
    #[error("Invalid redshift {0}: must be in [0, 1]")]
    Redshift(f64),
    /// The upper limit confidence level is outside `[0, 1]`.
    #[error("Invalid upper limit confidence level {0}: must be in [0, 1]")]
    ConfidenceLevel(f64),
    /// The object name is empty.
    #[error("Object name must not be empty")]
    EmptyName,
    /// The table could not be assembled.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

/// An unrecognized option value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid value {value:?}, expected one of: {expected}")]
pub struct InvalidOption {
    value: String,
    expected: &'static str,
}

macro_rules! option_values {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// The value as written in the table metadata.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)*
                    _ => Err(InvalidOption {
                        value: s.to_owned(),
                        expected: concat!($($s, " "),*).trim_ascii_end(),
                    }),
                }
            }
        }
    };
}

option_values! {
    /// The reference frame of the data.
    RestFrame {
        /// Observed fluxes.
        #[default]
        Obs => "obs",
        /// Source luminosities.
        Src => "src",
    }
}

option_values! {
    /// The scale of the data.
    DataScale {
        /// Linear.
        #[default]
        LinLin => "lin-lin",
        /// Logarithmic.
        LogLog => "log-log",
    }
}

/// Parameters attached to a Jetset table.
#[derive(Debug, Clone, PartialEq)]
pub struct JetsetOptions {
    /// Source redshift, in `[0, 1]`.
    pub z: f64,
    /// Confidence level for upper limits, in `[0, 1]`. Defaults to 0.95.
    pub ul_cl: f64,
    /// Reference frame. Defaults to observed.
    pub restframe: RestFrame,
    /// Data scale. Defaults to linear.
    pub data_scale: DataScale,
    /// Name of the object. Defaults to `new-src`.
    pub obj_name: String,
}

impl JetsetOptions {
    /// Options for a source at redshift `z`, with defaults for the rest.
    pub fn new(z: f64) -> Self {
        Self {
            z,
            ul_cl: 0.95,
            restframe: RestFrame::default(),
            data_scale: DataScale::default(),
            obj_name: "new-src".to_owned(),
        }
    }

    /// Check the value ranges.
    pub fn validate(&self) -> Result<(), JetsetError> {
        if !(0.0..=1.0).contains(&self.z) {
            return Err(JetsetError::Redshift(self.z));
        }

        if !(0.0..=1.0).contains(&self.ul_cl) {
            return Err(JetsetError::ConfidenceLevel(self.ul_cl));
        }

        if self.obj_name.is_empty() {
            return Err(JetsetError::EmptyName);
        }

        Ok(())
    }

    fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("z".to_owned(), self.z.to_string()),
            ("UL_CL".to_owned(), self.ul_cl.to_string()),
            ("restframe".to_owned(), self.restframe.to_string()),
            ("data_scale".to_owned(), self.data_scale.to_string()),
            ("obj_name".to_owned(), self.obj_name.clone()),
        ])
    }
}

fn field(name: &str, data_type: DataType, unit: Option<&str>) -> Field {
    let field = Field::new(name, data_type, false);
    match unit {
        Some(unit) => field.with_metadata(HashMap::from([(UNIT_KEY.to_owned(), unit.to_owned())])),
        None => field,
    }
}

impl SedResponse {
    /// Convert the data points into a table for Jetset.
    ///
    /// Columns follow Jetset's naming: `x`, `dx` (frequency and its error),
    /// `y`, `dy` (nu F_nu and its error), `T_start`, `T_stop` (MJD, 0 if
    /// unknown), `UL` (upper limit flag) and `dataset` (catalog name). The
    /// options are stored in the schema metadata.
    pub fn to_jetset(&self, opts: &JetsetOptions) -> Result<RecordBatch, JetsetError> {
        opts.validate()?;

        let points: Vec<_> = self.points().collect();
        let floats = |f: fn(&crate::SourceData) -> f64| -> ArrayRef {
            Arc::new(points.iter().map(|(_, p)| f(p)).collect::<Float64Array>())
        };

        // TODO: set UL from the entry's info flag once the service reports
        // upper limits with their values.
        let columns: Vec<ArrayRef> = vec![
            floats(|p| p.frequency),
            floats(|p| p.frequency_error),
            floats(|p| p.nufnu),
            floats(|p| p.nufnu_error),
            floats(|p| p.start_time.unwrap_or(0.0)),
            floats(|p| p.stop_time.unwrap_or(0.0)),
            Arc::new(BooleanArray::from(vec![false; points.len()])),
            Arc::new(
                points
                    .iter()
                    .map(|(c, _)| Some(c.catalog_name.as_str()))
                    .collect::<StringArray>(),
            ),
        ];

        let schema = Schema::new(vec![
            field("x", DataType::Float64, Some(units::HZ)),
            field("dx", DataType::Float64, Some(units::HZ)),
            field("y", DataType::Float64, Some(units::ENERGY_FLUX)),
            field("dy", DataType::Float64, Some(units::ENERGY_FLUX)),
            field("T_start", DataType::Float64, Some(units::DAY)),
            field("T_stop", DataType::Float64, Some(units::DAY)),
            field("UL", DataType::Boolean, None),
            field("dataset", DataType::Utf8, None),
        ])
        .with_metadata(opts.metadata());

        Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
    }
}
