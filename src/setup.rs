//! # Integration setup
//!
//! Prepares a validated [`SystemState`] for a short integration:
//!
//! 1. collision detection mode, from capabilities negotiated once with the integrator,
//! 2. exit distance for escape detection,
//! 3. symplectic integrator settings and chaos indicator tracking,
//! 4. integrator choice and timestep from the pericenter passage times,
//! 5. individual Hill radii as collision radii,
//! 6. recentering on the centre of mass.
//!
//! Steps 2, 4 and 5 read orbital elements relative to the dominant body, so
//! recentering is always last.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{ESCAPE_DISTANCE_FACTOR, HIGH_ECCENTRICITY, TIMESTEP_SAFETY_FACTOR},
    integrator::Integrator,
    orbit::Orbit,
    stability_errors::StabilityError,
    system::{ChaosIndicator, CollisionMode, IntegratorKind, SystemState, Timestep, WhFastSettings},
    validation::validate,
};

/// User-facing setup options.
///
/// Turning off both `megno` and `safe_mode` roughly halves integration cost, at the
/// price of a different (equally valid) trajectory realization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Track the MEGNO chaos indicator.
    pub megno: bool,
    /// Seed of the variational particles used by MEGNO.
    pub megno_seed: u64,
    /// Symplectic integrator safe mode.
    pub safe_mode: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            megno: true,
            megno_seed: 0,
            safe_mode: true,
        }
    }
}

/// Capabilities of the integrator, probed once and cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub line_collisions: bool,
}

impl EngineCapabilities {
    pub fn probe(integrator: &dyn Integrator) -> Self {
        let capabilities = Self {
            line_collisions: integrator.supports_line_collisions(),
        };
        log::debug!("integrator capabilities: {capabilities:?}");
        capabilities
    }

    /// Best available collision mode.
    pub fn collision_mode(&self) -> CollisionMode {
        if self.line_collisions {
            CollisionMode::Line
        } else {
            CollisionMode::Direct
        }
    }
}

/// Integrator choice and timestep for a set of orbits around the dominant body.
///
/// * `dt = 0.05 · min Tperi` with `Tperi = P (1−e)^1.5 / √(1+e)` when every orbit is
///   bound, [`Timestep::Degenerate`] otherwise or when there is no usable orbit.
/// * [`IntegratorKind::Ias15`] when `max e > 0.99`, [`IntegratorKind::WhFast`] otherwise.
pub fn integrator_and_timestep(orbits: &[Orbit]) -> (IntegratorKind, Timestep) {
    let max_e = orbits
        .iter()
        .map(|o| o.eccentricity)
        .fold(f64::NEG_INFINITY, f64::max);

    let integrator = if max_e > HIGH_ECCENTRICITY {
        IntegratorKind::Ias15
    } else {
        IntegratorKind::WhFast
    };

    let usable = !orbits.is_empty() && orbits.iter().all(|o| o.eccentricity.is_finite());
    let timestep = if usable && max_e < 1.0 {
        let min_tperi = orbits
            .iter()
            .map(Orbit::pericenter_passage_time)
            .fold(f64::INFINITY, f64::min);
        Timestep::Fixed(TIMESTEP_SAFETY_FACTOR * min_tperi)
    } else {
        log::warn!("no finite timestep (max eccentricity {max_e}); using the NaN sentinel");
        Timestep::Degenerate
    };

    (integrator, timestep)
}

/// Chooses integration settings for a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfigurer {
    config: SetupConfig,
    capabilities: EngineCapabilities,
}

impl IntegratorConfigurer {
    pub fn new(config: SetupConfig, capabilities: EngineCapabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    /// Build a configurer, probing the integrator's capabilities once.
    pub fn for_integrator(config: SetupConfig, integrator: &dyn Integrator) -> Self {
        Self::new(config, EngineCapabilities::probe(integrator))
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Validate `state` and set its integration fields.
    ///
    /// Only integration-related fields, collision radii and the Cartesian frame
    /// (recentered on the centre of mass) change.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::Validation`] if the state breaks its invariants.
    /// * [`StabilityError::InvalidOrbit`] if a body has no defined orbit.
    pub fn configure(&self, state: SystemState) -> Result<SystemState, StabilityError> {
        let mut state = validate(state)?;
        let orbits = state.orbits()?;

        state.collision = self.capabilities.collision_mode();

        let max_distance = orbits.iter().map(|o| o.distance).fold(f64::NAN, f64::max);
        state.exit_max_distance = max_distance
            .is_finite()
            .then_some(ESCAPE_DISTANCE_FACTOR * max_distance);

        state.whfast = WhFastSettings {
            safe_mode: self.config.safe_mode,
            keep_unsynchronized: false,
        };

        if self.config.megno && state.chaos_indicator.is_none() {
            state.chaos_indicator = Some(ChaosIndicator {
                seed: self.config.megno_seed,
            });
        }

        let (integrator, timestep) = integrator_and_timestep(&orbits);
        state.integrator = integrator;
        state.timestep = timestep;

        // Individual Hill radii around the dominant body, not mutual ones
        let primary_mass = state.primary().map_or(0.0, |p| p.mass);
        for (body, orbit) in state.bodies_mut().iter_mut().skip(1).zip(&orbits) {
            body.radius = orbit.semi_major_axis.abs() * (body.mass / (3.0 * primary_mass)).cbrt();
        }

        state.move_to_com();

        log::debug!(
            "configured {} bodies: {:?}, dt = {}, collisions {:?}",
            state.len(),
            state.integrator,
            state.timestep.value(),
            state.collision
        );

        Ok(state)
    }
}
