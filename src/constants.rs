//! # Constants and type definitions for stabsim
//!
//! This module centralizes the **numerical constants**, **unit conversion factors** and
//! **type aliases** used by the state-reduction pipeline.
//!
//! ## Overview
//!
//! - Integration safety factors (timestep, escape distance, eccentricity switch)
//! - Gravitational constants (SI and the normalized `a1 = P1 = 1` convention)
//! - Unit conversions to SI for the named unit systems in [`crate::units`]
//! - Planet mass–radius relation coefficients

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

// -------------------------------------------------------------------------------------------------
// Integration setup
// -------------------------------------------------------------------------------------------------

/// Fraction of the shortest pericenter passage time used as the fixed timestep
pub const TIMESTEP_SAFETY_FACTOR: f64 = 0.05;

/// Exit distance as a multiple of the largest initial heliocentric distance
pub const ESCAPE_DISTANCE_FACTOR: f64 = 100.0;

/// Above this eccentricity the adaptive integrator is selected
pub const HIGH_ECCENTRICITY: f64 = 0.99;

/// Gravitational constant in units where the innermost body has `a = 1` and `P = 1`
pub const NORMALIZED_G: f64 = DPI * DPI;

/// Numerical epsilon used for degenerate-geometry tests
pub const EPS: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Physical constants (SI)
// -------------------------------------------------------------------------------------------------

/// Newtonian gravitational constant in m³ kg⁻¹ s⁻² (CODATA 2018)
pub const G_SI: f64 = 6.674_30e-11;

/// Astronomical Unit in meters (IAU 2012)
pub const AU_M: f64 = 149_597_870_700.0;

/// Kilometer in meters
pub const KM_M: f64 = 1_000.0;

/// Solar mass in kilograms
pub const MSUN_KG: f64 = 1.988_409_87e30;

/// Jupiter mass in kilograms
pub const MJUPITER_KG: f64 = 1.898_125e27;

/// Earth mass in kilograms
pub const MEARTH_KG: f64 = 5.972_168e24;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in a Julian year
pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;

// -------------------------------------------------------------------------------------------------
// Mass–radius relation
// -------------------------------------------------------------------------------------------------

/// Earth mass in solar masses, as used by the mass–radius fit
pub const EARTH_MASS_SOLAR: f64 = 3.0e-6;

/// Mass–radius fit normalization, in Earth masses
pub const MASS_RADIUS_NORM: f64 = 2.7;

/// Mass–radius fit exponent
pub const MASS_RADIUS_EXPONENT: f64 = 1.3;

/// Earth radius in units of an innermost semi-major axis of about 0.1 AU
pub const EARTH_RADIUS_INNER_A: f64 = 4.26e-4;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;

/// Index of a body inside a [`crate::system::SystemState`]
pub type BodyIndex = usize;
