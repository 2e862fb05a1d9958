//! # Gravitational system state
//!
//! [`SystemState`] is the value passed between every stage of the reduction pipeline:
//! an ordered list of [`Body`] values whose index 0 is the dominant body, the
//! gravitational constant, the current time, and the integration settings chosen by
//! [`crate::setup`].
//!
//! A state is a plain owned value. `clone()` produces a deep, independent copy, so a
//! stage that receives a copy can never mutate the caller's state.
//!
//! ```rust
//! use stabsim::orbit::OrbitalElements;
//! use stabsim::system::SystemState;
//!
//! let mut state = SystemState::new(1.0);
//! state.add_primary(1.0);
//! state.add_orbiting(1e-5, &OrbitalElements::circular(1.0)).unwrap();
//! assert_eq!(state.len(), 2);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    body::Body,
    constants::BodyIndex,
    orbit::{Orbit, OrbitalElements},
    stability_errors::StabilityError,
    units::UnitSystem,
};

/// Integration scheme requested from the external integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// Fast fixed-step symplectic integrator
    #[default]
    WhFast,
    /// Adaptive high-precision integrator, for near-parabolic orbits
    Ias15,
}

/// Collision detection mode requested from the external integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    #[default]
    None,
    /// Point-distance checks at each step
    Direct,
    /// Swept-segment checks over each step, catches fast close encounters
    Line,
}

/// Integration timestep.
///
/// `Degenerate` is the documented not-a-number sentinel: it is set when no finite
/// timestep exists (a hyperbolic orbit, no orbiting body). Consumers that build time
/// series read it through [`Timestep::value`] and get `NaN`, so outputs keep a uniform
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Timestep {
    #[default]
    Unset,
    Fixed(f64),
    Degenerate,
}

impl Timestep {
    pub fn value(&self) -> f64 {
        match self {
            Timestep::Fixed(dt) => *dt,
            Timestep::Unset | Timestep::Degenerate => f64::NAN,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Timestep::Degenerate)
    }
}

/// Chaos indicator (MEGNO) tracking requested from the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosIndicator {
    pub seed: u64,
}

/// Settings of the symplectic integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhFastSettings {
    pub safe_mode: bool,
    pub keep_unsynchronized: bool,
}

impl Default for WhFastSettings {
    fn default() -> Self {
        Self {
            safe_mode: true,
            keep_unsynchronized: false,
        }
    }
}

/// Gravitational many-body configuration.
///
/// Invariant checked by [`crate::validation::validate`]: the body at index 0 is the
/// most massive one. The invariant is never restored by reordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemState {
    bodies: Vec<Body>,
    pub g: f64,
    pub t: f64,
    pub integrator: IntegratorKind,
    pub timestep: Timestep,
    pub collision: CollisionMode,
    pub exit_max_distance: Option<f64>,
    pub chaos_indicator: Option<ChaosIndicator>,
    pub whfast: WhFastSettings,
    pub units: Option<UnitSystem>,
}

impl SystemState {
    /// Empty system with gravitational constant `g` at `t = 0`.
    pub fn new(g: f64) -> Self {
        Self {
            bodies: Vec::new(),
            g,
            t: 0.0,
            integrator: IntegratorKind::default(),
            timestep: Timestep::default(),
            collision: CollisionMode::default(),
            exit_max_distance: None,
            chaos_indicator: None,
            whfast: WhFastSettings::default(),
            units: None,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The dominant body, if any.
    pub fn primary(&self) -> Option<&Body> {
        self.bodies.first()
    }

    pub fn body(&self, index: BodyIndex) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Append a body and return its index.
    pub fn add(&mut self, body: Body) -> BodyIndex {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Append a dominant body of the given mass at rest at the origin.
    pub fn add_primary(&mut self, mass: f64) -> BodyIndex {
        self.add(Body::at_rest(mass))
    }

    /// Append a body on the given orbit around the dominant body.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidSelection`] if the system has no dominant body yet.
    /// * [`StabilityError::InvalidOrbit`] if the elements cannot be placed.
    pub fn add_orbiting(
        &mut self,
        mass: f64,
        elements: &OrbitalElements,
    ) -> Result<BodyIndex, StabilityError> {
        let body = self.body_on_orbit(mass, elements)?;
        Ok(self.add(body))
    }

    /// Remove the body at `index`, shifting later bodies down by one.
    pub fn remove(&mut self, index: BodyIndex) -> Result<Body, StabilityError> {
        if index >= self.bodies.len() {
            return Err(StabilityError::InvalidSelection(format!(
                "cannot remove body {index} from a system of {} bodies",
                self.bodies.len()
            )));
        }
        Ok(self.bodies.remove(index))
    }

    /// Overwrite the mass and orbit of the body at `index`, keeping its radius.
    ///
    /// The new Cartesian state is placed relative to the current dominant body.
    pub fn set_orbit(
        &mut self,
        index: BodyIndex,
        mass: f64,
        elements: &OrbitalElements,
    ) -> Result<(), StabilityError> {
        if index == 0 || index >= self.bodies.len() {
            return Err(StabilityError::InvalidSelection(format!(
                "cannot set the orbit of body {index} in a system of {} bodies",
                self.bodies.len()
            )));
        }
        let radius = self.bodies[index].radius;
        let body = self.body_on_orbit(mass, elements)?;
        self.bodies[index] = Body { radius, ..body };
        Ok(())
    }

    fn body_on_orbit(&self, mass: f64, elements: &OrbitalElements) -> Result<Body, StabilityError> {
        let primary = self.primary().ok_or_else(|| {
            StabilityError::InvalidSelection("system has no dominant body to orbit".into())
        })?;
        let (position, velocity) = elements.to_cartesian(self.g * (primary.mass + mass))?;
        Ok(Body {
            mass,
            position: primary.position + position,
            velocity: primary.velocity + velocity,
            radius: 0.0,
        })
    }

    /// Osculating orbit of body `index` around the dominant body.
    pub fn orbit(&self, index: BodyIndex) -> Result<Orbit, StabilityError> {
        match (self.primary(), self.bodies.get(index)) {
            (Some(primary), Some(body)) if index > 0 => body.orbit(primary, self.g),
            _ => Err(StabilityError::InvalidSelection(format!(
                "body {index} has no orbit in a system of {} bodies",
                self.bodies.len()
            ))),
        }
    }

    /// Orbits of every non-dominant body, in index order.
    pub fn orbits(&self) -> Result<Vec<Orbit>, StabilityError> {
        (1..self.bodies.len()).map(|i| self.orbit(i)).collect()
    }

    /// `true` if any non-dominant body is on a hyperbolic (`a < 0`) orbit.
    pub fn is_hyperbolic(&self) -> Result<bool, StabilityError> {
        Ok(self.orbits()?.iter().any(Orbit::is_hyperbolic))
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Total angular momentum about the origin, `Σ m (r × v)`.
    pub fn total_angular_momentum(&self) -> Vector3<f64> {
        self.bodies.iter().map(Body::angular_momentum).sum()
    }

    /// Centre of mass `(position, velocity)`.
    pub fn center_of_mass(&self) -> (Vector3<f64>, Vector3<f64>) {
        let mass = self.total_mass();
        if mass == 0.0 {
            return (Vector3::zeros(), Vector3::zeros());
        }
        let position: Vector3<f64> = self.bodies.iter().map(|b| b.position * b.mass).sum();
        (position / mass, self.total_momentum() / mass)
    }

    /// Shift every body into the centre-of-mass frame.
    pub fn move_to_com(&mut self) {
        let (com_position, com_velocity) = self.center_of_mass();
        for body in &mut self.bodies {
            body.position -= com_position;
            body.velocity -= com_velocity;
        }
    }
}

#[cfg(test)]
pub(crate) mod system_test {
    use super::*;
    use crate::{constants::DPI, orbit::semi_major_axis_from_period};
    use approx::assert_relative_eq;

    /// Dominant mass 1 with three `1e-5` bodies at periods 1, 2 and 3, circular.
    pub(crate) fn three_planet_system() -> SystemState {
        let g = DPI * DPI;
        let mut state = SystemState::new(g);
        state.add_primary(1.0);
        for (k, period) in [1.0_f64, 2.0, 3.0].iter().enumerate() {
            let mass = 1e-5;
            let elements = OrbitalElements {
                longitude_of_node: 0.3 * k as f64,
                inclination: 0.01 * (k + 1) as f64,
                ..OrbitalElements::circular(semi_major_axis_from_period(*period, g * (1.0 + mass)))
            };
            state.add_orbiting(mass, &elements).unwrap();
        }
        state
    }

    #[test]
    fn test_timestep_sentinel() {
        assert!(Timestep::Degenerate.value().is_nan());
        assert!(Timestep::Unset.value().is_nan());
        assert_eq!(Timestep::Fixed(0.05).value(), 0.05);
        assert!(Timestep::Degenerate.is_degenerate());
    }

    #[test]
    fn test_add_orbiting_uses_period() {
        let state = three_planet_system();
        let orbits = state.orbits().unwrap();
        assert_eq!(orbits.len(), 3);
        for (orbit, period) in orbits.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(orbit.period, period, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let state = three_planet_system();
        let mut copy = state.clone();
        copy.bodies_mut()[1].mass = 42.0;
        copy.remove(2).unwrap();
        assert_eq!(state.len(), 4);
        assert_eq!(state.bodies()[1].mass, 1e-5);
    }

    #[test]
    fn test_move_to_com() {
        let mut state = three_planet_system();
        state.move_to_com();
        let (position, velocity) = state.center_of_mass();
        assert!(position.norm() < 1e-15);
        assert!(velocity.norm() < 1e-15);
    }

    #[test]
    fn test_set_orbit_keeps_radius() {
        let mut state = three_planet_system();
        state.bodies_mut()[2].radius = 0.25;
        state
            .set_orbit(2, 2e-5, &OrbitalElements::circular(5.0))
            .unwrap();
        assert_eq!(state.bodies()[2].radius, 0.25);
        assert_eq!(state.bodies()[2].mass, 2e-5);
        assert_relative_eq!(state.orbit(2).unwrap().semi_major_axis, 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_orbit_of_primary_is_an_error() {
        let state = three_planet_system();
        assert!(state.orbit(0).is_err());
        assert!(state.orbit(9).is_err());
        assert!(!state.is_hyperbolic().unwrap());
    }
}
