//! # Named unit systems
//!
//! A [`UnitSystem`] is a triple of length, mass and time units. It only serves to
//! express the gravitational constant in those units, `G = G_SI · M · T² / L³`, when a
//! dimensionless state is reverted to physical units.
//!
//! Unit names are case-insensitive: `m`, `km`, `au` for lengths; `kg`, `msun`,
//! `mjupiter`, `mearth` for masses; `s`, `day`, `yr`, `yr2pi` for times.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        AU_M, DPI, G_SI, KM_M, MEARTH_KG, MJUPITER_KG, MSUN_KG, SECONDS_PER_DAY, SECONDS_PER_YEAR,
    },
    stability_errors::StabilityError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    M,
    Km,
    Au,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Kg,
    Msun,
    Mjupiter,
    Mearth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    S,
    Day,
    Yr,
    /// One year divided by 2π, so that `G = 1` in (AU, Msun, yr2pi)
    Yr2pi,
}

impl LengthUnit {
    pub fn in_meters(self) -> f64 {
        match self {
            LengthUnit::M => 1.0,
            LengthUnit::Km => KM_M,
            LengthUnit::Au => AU_M,
        }
    }
}

impl MassUnit {
    pub fn in_kilograms(self) -> f64 {
        match self {
            MassUnit::Kg => 1.0,
            MassUnit::Msun => MSUN_KG,
            MassUnit::Mjupiter => MJUPITER_KG,
            MassUnit::Mearth => MEARTH_KG,
        }
    }
}

impl TimeUnit {
    pub fn in_seconds(self) -> f64 {
        match self {
            TimeUnit::S => 1.0,
            TimeUnit::Day => SECONDS_PER_DAY,
            TimeUnit::Yr => SECONDS_PER_YEAR,
            TimeUnit::Yr2pi => SECONDS_PER_YEAR / DPI,
        }
    }
}

fn unknown_unit(kind: &str, name: &str) -> StabilityError {
    StabilityError::UnitConversion(format!("unknown {kind} unit '{name}'"))
}

impl FromStr for LengthUnit {
    type Err = StabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(LengthUnit::M),
            "km" => Ok(LengthUnit::Km),
            "au" => Ok(LengthUnit::Au),
            _ => Err(unknown_unit("length", s)),
        }
    }
}

impl FromStr for MassUnit {
    type Err = StabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(MassUnit::Kg),
            "msun" | "msolar" => Ok(MassUnit::Msun),
            "mjupiter" | "mjup" => Ok(MassUnit::Mjupiter),
            "mearth" => Ok(MassUnit::Mearth),
            _ => Err(unknown_unit("mass", s)),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = StabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" => Ok(TimeUnit::S),
            "day" | "days" => Ok(TimeUnit::Day),
            "yr" | "year" | "years" => Ok(TimeUnit::Yr),
            "yr2pi" => Ok(TimeUnit::Yr2pi),
            _ => Err(unknown_unit("time", s)),
        }
    }
}

/// A consistent set of physical units for a [`crate::system::SystemState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSystem {
    pub length: LengthUnit,
    pub mass: MassUnit,
    pub time: TimeUnit,
}

impl UnitSystem {
    /// Gravitational constant expressed in this unit system.
    pub fn gravitational_constant(&self) -> f64 {
        let l = self.length.in_meters();
        G_SI * self.mass.in_kilograms() * self.time.in_seconds().powi(2) / (l * l * l)
    }
}

/// Unit names as supplied by a caller; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub length: Option<String>,
    pub mass: Option<String>,
    pub time: Option<String>,
}

impl UnitSpec {
    pub fn new(length: &str, mass: &str, time: &str) -> Self {
        Self {
            length: Some(length.to_string()),
            mass: Some(mass.to_string()),
            time: Some(time.to_string()),
        }
    }

    /// Parse the named units.
    ///
    /// Return
    /// ------
    /// * `Ok(None)` when any of the three names is missing: no unit system applies and
    ///   the caller's gravitational constant is used as is.
    /// * `Ok(Some(units))` when all three names are present and known.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::UnitConversion`] when a present name is unknown.
    pub fn resolve(&self) -> Result<Option<UnitSystem>, StabilityError> {
        let length = self.length.as_deref().map(LengthUnit::from_str).transpose()?;
        let mass = self.mass.as_deref().map(MassUnit::from_str).transpose()?;
        let time = self.time.as_deref().map(TimeUnit::from_str).transpose()?;

        Ok(match (length, mass, time) {
            (Some(length), Some(mass), Some(time)) => Some(UnitSystem { length, mass, time }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod units_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_g_is_one_in_yr2pi_units() {
        let units = UnitSystem {
            length: LengthUnit::Au,
            mass: MassUnit::Msun,
            time: TimeUnit::Yr2pi,
        };
        assert_relative_eq!(units.gravitational_constant(), 1.0, max_relative = 1e-3);
    }

    #[test]
    fn test_g_in_au_msun_yr_is_four_pi_squared() {
        let units = UnitSystem {
            length: LengthUnit::Au,
            mass: MassUnit::Msun,
            time: TimeUnit::Yr,
        };
        assert_relative_eq!(units.gravitational_constant(), DPI * DPI, max_relative = 1e-3);
    }

    #[test]
    fn test_g_si() {
        let units = UnitSystem {
            length: LengthUnit::M,
            mass: MassUnit::Kg,
            time: TimeUnit::S,
        };
        assert_eq!(units.gravitational_constant(), G_SI);
    }

    #[test]
    fn test_spec_resolution() {
        let spec = UnitSpec::new("AU", "Msun", "yr");
        assert_eq!(
            spec.resolve().unwrap(),
            Some(UnitSystem {
                length: LengthUnit::Au,
                mass: MassUnit::Msun,
                time: TimeUnit::Yr,
            })
        );

        let partial = UnitSpec {
            length: Some("au".into()),
            ..UnitSpec::default()
        };
        assert_eq!(partial.resolve().unwrap(), None);

        let bad = UnitSpec::new("parsec", "msun", "yr");
        assert_eq!(
            bad.resolve(),
            Err(StabilityError::UnitConversion(
                "unknown length unit 'parsec'".into()
            ))
        );
    }
}
