//! # Two-body orbital elements
//!
//! Conversions between the Cartesian state of a body relative to the dominant body
//! and its osculating orbital elements.
//!
//! ## Element set
//!
//! 1. **a** – Semi-major axis (negative for hyperbolic orbits)
//! 2. **e** – Eccentricity
//! 3. **inc** – Inclination (radians)
//! 4. **Ω** – Longitude of ascending node (radians)
//! 5. **ϖ** – Longitude of pericenter, `ϖ = Ω + ω` (radians)
//! 6. **l** or **θ** – Mean longitude `l = ϖ + M`, or true longitude `θ = ϖ + f`
//!
//! Longitudes are used instead of arguments so that near-circular and near-planar
//! orbits keep a well-defined phase.
//!
//! ## Degeneracies
//!
//! - **Circular orbits (`e → 0`)**: the argument of pericenter is set to `0.0`, so
//!   `ϖ = Ω`; the mean and true longitudes stay meaningful.
//! - **Planar orbits (`inc → 0`)**: the node is set to `0.0`; `ϖ` is then measured
//!   from the x axis.
//! - **Parabolic (`e = 1`) and radial orbits** cannot be represented and are rejected
//!   with [`StabilityError::InvalidOrbit`].
//!
//! The Cartesian state is authoritative: `elements → Cartesian → elements` reproduces
//! the input to floating-point tolerance.

use std::fmt;

use nalgebra::Vector3;

use crate::{
    constants::{Radian, DPI, EPS, RADEG},
    geometry::{euler_angles_matrix, rotation_about, Axis},
    kepler::{mean_from_true, principal_angle, true_from_mean},
    stability_errors::StabilityError,
};

/// Phase of a body along its orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitalPhase {
    /// `l = ϖ + M`
    MeanLongitude(Radian),
    /// `θ = ϖ + f`
    TrueLongitude(Radian),
}

/// Osculating orbital elements used to place a body relative to the dominant body.
///
/// Units
/// -----
/// * `semi_major_axis`: length unit of the owning system (negative when hyperbolic).
/// * `eccentricity`: unitless.
/// * angles: radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub longitude_of_node: Radian,
    pub longitude_of_pericenter: Radian,
    pub phase: OrbitalPhase,
}

impl OrbitalElements {
    /// Planar circular orbit of radius `a`, at zero longitude.
    pub fn circular(semi_major_axis: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_of_node: 0.0,
            longitude_of_pericenter: 0.0,
            phase: OrbitalPhase::MeanLongitude(0.0),
        }
    }

    /// Cartesian state `(position, velocity)` relative to the dominant body.
    ///
    /// Arguments
    /// ---------
    /// * `mu`: `G · (M_dominant + m)`.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidOrbit`] for parabolic orbits, inconsistent signs of `a`
    ///   and `1 − e`, or a hyperbolic true longitude beyond the asymptote.
    pub fn to_cartesian(&self, mu: f64) -> Result<(Vector3<f64>, Vector3<f64>), StabilityError> {
        let a = self.semi_major_axis;
        let e = self.eccentricity;

        if mu.is_nan() || mu <= 0.0 || mu.is_infinite() {
            return Err(StabilityError::InvalidOrbit(format!(
                "gravitational parameter must be positive, got {mu}"
            )));
        }
        if e.is_nan() || e < 0.0 || (e - 1.0).abs() < EPS {
            return Err(StabilityError::InvalidOrbit(format!(
                "eccentricity {e} is negative or parabolic"
            )));
        }
        if !a.is_finite() || a == 0.0 || (a > 0.0) != (e < 1.0) {
            return Err(StabilityError::InvalidOrbit(format!(
                "semi-major axis {a} is inconsistent with eccentricity {e}"
            )));
        }

        let omega = self.longitude_of_pericenter - self.longitude_of_node;
        let true_anomaly = match self.phase {
            OrbitalPhase::TrueLongitude(theta) => theta - self.longitude_of_pericenter,
            OrbitalPhase::MeanLongitude(l) => true_from_mean(l - self.longitude_of_pericenter, e),
        };

        let (sin_f, cos_f) = true_anomaly.sin_cos();
        let denom = 1.0 + e * cos_f;
        if denom <= 0.0 {
            return Err(StabilityError::InvalidOrbit(format!(
                "true anomaly {true_anomaly} lies beyond the hyperbolic asymptote"
            )));
        }

        // Semi-latus rectum, positive for both conic families
        let p = a * (1.0 - e * e);
        let r = p / denom;
        let vfac = (mu / p).sqrt();

        let r_pf = Vector3::new(r * cos_f, r * sin_f, 0.0);
        let v_pf = Vector3::new(-vfac * sin_f, vfac * (e + cos_f), 0.0);

        let rot = euler_angles_matrix(self.longitude_of_node, self.inclination, omega);
        Ok((rot * r_pf, rot * v_pf))
    }
}

/// Semi-major axis of a bound orbit with the given period, from Kepler's third law.
pub fn semi_major_axis_from_period(period: f64, mu: f64) -> f64 {
    (mu * period * period / (DPI * DPI)).cbrt()
}

/// Full set of osculating elements derived from a Cartesian state.
///
/// See also
/// --------
/// * [`Orbit::from_cartesian`] – the constructor.
/// * [`Orbit::elements`] – the subset needed to rebuild the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub longitude_of_node: Radian,
    pub longitude_of_pericenter: Radian,
    pub mean_longitude: Radian,
    pub true_longitude: Radian,
    /// Orbital period; for hyperbolic orbits, `2π / n` with `n = √(μ/|a|³)`
    pub period: f64,
    /// Distance to the dominant body
    pub distance: f64,
}

impl Orbit {
    /// Osculating elements of a relative state.
    ///
    /// Arguments
    /// ---------
    /// * `position`, `velocity`: state relative to the dominant body.
    /// * `mu`: `G · (M_dominant + m)`.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidOrbit`] for a body sitting on the dominant body, a
    ///   radial trajectory (zero angular momentum) or an exactly parabolic orbit.
    pub fn from_cartesian(
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mu: f64,
    ) -> Result<Self, StabilityError> {
        let distance = position.norm();
        if distance == 0.0 || !distance.is_finite() || mu.is_nan() || mu <= 0.0 {
            return Err(StabilityError::InvalidOrbit(format!(
                "cannot derive elements at distance {distance} with mu {mu}"
            )));
        }

        let v2 = velocity.norm_squared();
        let angular_momentum = position.cross(velocity);
        let h = angular_momentum.norm();
        if h <= EPS * distance * v2.sqrt() {
            return Err(StabilityError::InvalidOrbit(
                "radial trajectory has no orbital plane".into(),
            ));
        }

        let reciprocal_a = 2.0 / distance - v2 / mu;
        if reciprocal_a == 0.0 {
            return Err(StabilityError::InvalidOrbit("parabolic orbit".into()));
        }
        let semi_major_axis = 1.0 / reciprocal_a;

        // Laplace-Runge-Lenz vector divided by mu
        let ecc_vec = ((v2 - mu / distance) * position - position.dot(velocity) * velocity) / mu;
        let eccentricity = ecc_vec.norm();

        let inclination = (angular_momentum.z / h).clamp(-1.0, 1.0).acos();
        let sin_i = (angular_momentum.x.powi(2) + angular_momentum.y.powi(2)).sqrt() / h;
        let longitude_of_node = if sin_i < EPS {
            0.0
        } else {
            principal_angle(angular_momentum.x.atan2(-angular_momentum.y))
        };

        // Orbital frame: x axis along the line of nodes, z along the angular momentum
        let to_orbital =
            rotation_about(Axis::X, -inclination) * rotation_about(Axis::Z, -longitude_of_node);
        let r_orb = to_orbital * position;
        let e_orb = to_orbital * ecc_vec;

        let argument_of_latitude = r_orb.y.atan2(r_orb.x);
        let argument_of_pericenter = if eccentricity < EPS {
            0.0
        } else {
            e_orb.y.atan2(e_orb.x)
        };
        let true_anomaly = argument_of_latitude - argument_of_pericenter;

        let longitude_of_pericenter = principal_angle(longitude_of_node + argument_of_pericenter);
        let mean_anomaly = mean_from_true(true_anomaly, eccentricity);
        let mean_longitude = if eccentricity < 1.0 {
            principal_angle(longitude_of_pericenter + mean_anomaly)
        } else {
            longitude_of_pericenter + mean_anomaly
        };

        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination,
            longitude_of_node,
            longitude_of_pericenter,
            mean_longitude,
            true_longitude: principal_angle(longitude_of_node + argument_of_latitude),
            period: DPI * (semi_major_axis.abs().powi(3) / mu).sqrt(),
            distance,
        })
    }

    /// Elements with the mean longitude as phase.
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements {
            phase: OrbitalPhase::MeanLongitude(self.mean_longitude),
            ..self.elements_with_true_longitude()
        }
    }

    /// Elements with the true longitude as phase.
    pub fn elements_with_true_longitude(&self) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            longitude_of_node: self.longitude_of_node,
            longitude_of_pericenter: self.longitude_of_pericenter,
            phase: OrbitalPhase::TrueLongitude(self.true_longitude),
        }
    }

    /// Time from apocenter-side crossing to pericenter, `P (1−e)^1.5 / √(1+e)`.
    ///
    /// Only meaningful for bound orbits.
    pub fn pericenter_passage_time(&self) -> f64 {
        let e = self.eccentricity;
        self.period * (1.0 - e).powf(1.5) / (1.0 + e).sqrt()
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.semi_major_axis < 0.0
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Osculating orbit")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "  a   (semi-major axis)        = {:.6}", self.semi_major_axis)?;
        writeln!(f, "  e   (eccentricity)           = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)            = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)      = {:.6} rad ({:.6}°)",
            self.longitude_of_node,
            self.longitude_of_node * rad_to_deg
        )?;
        writeln!(
            f,
            "  ϖ   (longitude of pericenter) = {:.6} rad ({:.6}°)",
            self.longitude_of_pericenter,
            self.longitude_of_pericenter * rad_to_deg
        )?;
        writeln!(
            f,
            "  l   (mean longitude)         = {:.6} rad ({:.6}°)",
            self.mean_longitude,
            self.mean_longitude * rad_to_deg
        )?;
        write!(f, "  P   (period)                 = {:.6}", self.period)
    }
}
