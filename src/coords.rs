//! Sky coordinates accepted by the SED Builder service.

use std::fmt;

/// A coordinate value was rejected before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Right ascension outside `[0, 360)` degrees, or not finite.
    #[error("Invalid right ascension {0}: must be in [0, 360) degrees")]
    RightAscension(f64),
    /// Declination outside `[-90, 90]` degrees, or not finite.
    #[error("Invalid declination {0}: must be in [-90, 90] degrees")]
    Declination(f64),
}

/// An equatorial position on the sky, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    ra: f64,
    dec: f64,
}

impl Coordinates {
    /// Validate and build a position. `ra` must lie in `[0, 360)` and `dec`
    /// in `[-90, 90]`. NaN and infinite values are rejected.
    pub fn new(ra: f64, dec: f64) -> Result<Self, CoordinateError> {
        // Range checks are false for NaN, so finiteness comes for free.
        if !(0.0..360.0).contains(&ra) {
            return Err(CoordinateError::RightAscension(ra));
        }

        if !(-90.0..=90.0).contains(&dec) {
            return Err(CoordinateError::Declination(dec));
        }

        Ok(Self { ra, dec })
    }

    /// Right ascension in degrees.
    pub fn ra(&self) -> f64 {
        self.ra
    }

    /// Declination in degrees.
    pub fn dec(&self) -> f64 {
        self.dec
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ra={} dec={}", self.ra, self.dec)
    }
}
