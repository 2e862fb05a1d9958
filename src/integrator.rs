//! # Integrator capability
//!
//! The numerical integrator is an external collaborator. This module only states what
//! the reduction pipeline expects from it.

use crate::{
    collision::{CollisionHandler, CollisionResponse},
    constants::BodyIndex,
    stability_errors::StabilityError,
    system::SystemState,
};

/// How an integration segment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationStatus {
    /// The target time was reached.
    Completed,
    /// A collision handler asked to halt; its removal directive was already applied.
    Halted(CollisionResponse),
    /// A body went beyond `exit_max_distance`.
    Escaped { index: BodyIndex },
}

/// A gravitational integrator advancing a [`SystemState`] in time.
///
/// Contract
/// --------
/// * `integrate` is blocking and works on an exclusively borrowed state.
/// * It honours `state.integrator`, `state.timestep`, `state.collision`,
///   `state.exit_max_distance` and `state.chaos_indicator`.
/// * On a collision it calls `handler.on_collision`, removes the slot named in the
///   returned [`CollisionResponse::remove`], and returns
///   [`IntegrationStatus::Halted`] when [`CollisionResponse::halt`] is set.
pub trait Integrator {
    /// Whether swept-segment collision detection is available.
    ///
    /// Probed once by [`crate::setup::EngineCapabilities::probe`].
    fn supports_line_collisions(&self) -> bool;

    /// Advance `state` up to time `t_end`.
    fn integrate(
        &mut self,
        state: &mut SystemState,
        t_end: f64,
        handler: &mut dyn CollisionHandler,
    ) -> Result<IntegrationStatus, StabilityError>;
}
