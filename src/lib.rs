//! A client for the [ASI-SSDC SED Builder](https://tools.ssdc.asi.it/SED/).
//!
//! The SED Builder combines data from several missions and experiments, both
//! ground and space-based, together with catalogs and archival data, into
//! Spectral Energy Distributions. This crate queries it for a sky position
//! and converts the result into a few handy shapes.
//!
//! # Quick start
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let sed = sedbuilder::get_data(194.04625, -5.789167)?;
//!
//! // An Arrow table, one row per data point, with units.
//! let table = sed.to_record_batch()?;
//! println!("{} rows", table.num_rows());
//!
//! // Or the raw document.
//! println!("{}", sed.to_json());
//! # Ok(())
//! # }
//! ```
//!
//! # HTTP Requests and Responses
//!
//! [`Client`] uses ureq, but the API types work with any HTTP client that
//! uses the [`http`] crate. Use [`ApiRequest::into_request`] to create a
//! request, and [`ApiResponse::from_response`] to parse the response.
//!
//! ```
//! use sedbuilder::{ApiRequest, ApiResponse, Coordinates, Profile, SedResponse, get_data::GetData};
//!
//! # fn main() -> anyhow::Result<()> {
//! let req = GetData {
//!     coords: Coordinates::new(83.6329, 22.0144)?,
//! };
//! let http_req = req.into_request(&Profile::default())?;
//! assert_eq!(http_req.method(), http::Method::GET);
//!
//! // ...send it, then:
//! let body = br#"{"ResponseInfo": {"statusCode": "OK"}, "Properties": {"Nh": 1e20}, "Catalogs": []}"#;
//! let resp = http::Response::new(&body[..]);
//! let sed = SedResponse::from_response(resp)?;
//! assert!(sed.is_successful());
//! # Ok(())
//! # }
//! ```

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

mod api;
mod client;
pub mod config;
mod coords;
pub mod jetset;
mod schema;
pub mod table;

pub use api::*;
pub use client::{Client, Error, get_data};
pub use config::Profile;
pub use coords::{CoordinateError, Coordinates};
pub use schema::*;
