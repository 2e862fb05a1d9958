#![allow(dead_code)]

use std::collections::VecDeque;

use approx::assert_relative_eq;
use stabsim::{
    collision::{CollisionHandler, CollisionPair},
    constants::DPI,
    integrator::{IntegrationStatus, Integrator},
    orbit::{semi_major_axis_from_period, Orbit, OrbitalElements},
    stability_errors::StabilityError,
    system::{CollisionMode, IntegratorKind, SystemState, Timestep},
};

pub fn assert_orbit_close(actual: &Orbit, expected: &Orbit, epsilon: f64) {
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        max_relative = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
}

/// Dominant mass 1 with `periods.len()` bodies of mass `mass`, `G = 4π²`.
pub fn planetary_system(mass: f64, periods: &[f64]) -> SystemState {
    let g = DPI * DPI;
    let mut state = SystemState::new(g);
    state.add_primary(1.0);
    for (k, period) in periods.iter().enumerate() {
        let elements = OrbitalElements {
            eccentricity: 0.01 * k as f64,
            inclination: 0.02 * (k + 1) as f64,
            longitude_of_node: 0.7 * k as f64,
            longitude_of_pericenter: 1.3 * k as f64,
            ..OrbitalElements::circular(semi_major_axis_from_period(*period, g * (1.0 + mass)))
        };
        state
            .add_orbiting(mass, &elements)
            .expect("valid test orbit");
    }
    state
}

/// What a [`ScriptedIntegrator`] does on one `integrate` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedEvent {
    Collide { i: usize, j: usize },
    Escape { index: usize },
    Fail,
}

/// Settings seen by the integrator at the start of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeenSettings {
    pub n_bodies: usize,
    pub integrator: IntegratorKind,
    pub timestep: Timestep,
    pub collision: CollisionMode,
}

/// Deterministic integrator: bodies do not move, events are replayed in order and
/// every call without a pending event completes the segment.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIntegrator {
    pub line_collisions: bool,
    pub events: VecDeque<ScriptedEvent>,
    pub seen: Vec<SeenSettings>,
}

impl ScriptedIntegrator {
    pub fn new(line_collisions: bool, events: &[ScriptedEvent]) -> Self {
        Self {
            line_collisions,
            events: events.iter().copied().collect(),
            seen: Vec::new(),
        }
    }
}

impl Integrator for ScriptedIntegrator {
    fn supports_line_collisions(&self) -> bool {
        self.line_collisions
    }

    fn integrate(
        &mut self,
        state: &mut SystemState,
        t_end: f64,
        handler: &mut dyn CollisionHandler,
    ) -> Result<IntegrationStatus, StabilityError> {
        self.seen.push(SeenSettings {
            n_bodies: state.len(),
            integrator: state.integrator,
            timestep: state.timestep,
            collision: state.collision,
        });

        match self.events.pop_front() {
            None => {
                state.t = t_end;
                Ok(IntegrationStatus::Completed)
            }
            Some(ScriptedEvent::Collide { i, j }) => {
                state.t += 0.5 * (t_end - state.t);
                let response = handler.on_collision(state, CollisionPair { i, j })?;
                response.apply_removal(state)?;
                if response.halt {
                    Ok(IntegrationStatus::Halted(response))
                } else {
                    state.t = t_end;
                    Ok(IntegrationStatus::Completed)
                }
            }
            Some(ScriptedEvent::Escape { index }) => Ok(IntegrationStatus::Escaped { index }),
            Some(ScriptedEvent::Fail) => Err(StabilityError::Integration(
                "scripted failure".into(),
            )),
        }
    }
}
