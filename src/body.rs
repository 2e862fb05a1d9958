use nalgebra::Vector3;

use crate::{
    constants::{EARTH_MASS_SOLAR, EARTH_RADIUS_INNER_A, MASS_RADIUS_EXPONENT, MASS_RADIUS_NORM},
    orbit::Orbit,
    stability_errors::StabilityError,
};

/// A point mass with a collision radius.
///
/// The Cartesian state is authoritative; orbital elements are derived with
/// [`Body::orbit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mass: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Collision radius
    pub radius: f64,
}

impl Body {
    /// A body at rest at the origin.
    pub fn at_rest(mass: f64) -> Self {
        Self {
            mass,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            radius: 0.0,
        }
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity) * self.mass
    }

    /// Osculating orbit of this body around `primary`.
    ///
    /// Arguments
    /// ---------
    /// * `primary`: the dominant body.
    /// * `g`: gravitational constant of the owning system.
    pub fn orbit(&self, primary: &Body, g: f64) -> Result<Orbit, StabilityError> {
        Orbit::from_cartesian(
            &(self.position - primary.position),
            &(self.velocity - primary.velocity),
            g * (primary.mass + self.mass),
        )
    }

    /// Planet radius from its mass with an empirical mass–radius relation.
    ///
    /// `mass` is in units of the dominant (solar) mass; the radius is returned in units
    /// of an innermost semi-major axis of about 0.1 AU.
    pub fn radius_from_mass(mass: f64) -> f64 {
        let radius_earth =
            (mass / (MASS_RADIUS_NORM * EARTH_MASS_SOLAR)).powf(1.0 / MASS_RADIUS_EXPONENT);
        radius_earth * EARTH_RADIUS_INNER_A
    }
}

#[cfg(test)]
mod body_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_momentum_and_angular_momentum() {
        let body = Body {
            mass: 2.0,
            position: Vector3::new(1.0, 0.0, 0.0),
            velocity: Vector3::new(0.0, 3.0, 0.0),
            radius: 0.1,
        };
        assert_eq!(body.momentum(), Vector3::new(0.0, 6.0, 0.0));
        assert_eq!(body.angular_momentum(), Vector3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_orbit_is_relative_to_primary() {
        let offset = Vector3::new(5.0, -2.0, 1.0);
        let drift = Vector3::new(0.1, 0.2, -0.3);
        let primary = Body {
            position: offset,
            velocity: drift,
            ..Body::at_rest(1.0)
        };
        let body = Body {
            mass: 0.0,
            position: offset + Vector3::new(1.0, 0.0, 0.0),
            velocity: drift + Vector3::new(0.0, 1.0, 0.0),
            radius: 0.0,
        };
        let orbit = body.orbit(&primary, 1.0).unwrap();
        assert_relative_eq!(orbit.semi_major_axis, 1.0, epsilon = 1e-12);
        assert!(orbit.eccentricity < 1e-12);
    }

    #[test]
    fn test_radius_from_mass() {
        // 2.7 Earth masses map to exactly one Earth radius
        let radius = Body::radius_from_mass(2.7 * 3.0e-6);
        assert_relative_eq!(radius, 4.26e-4, max_relative = 1e-12);
        assert!(Body::radius_from_mass(1e-4) > radius);
    }
}
