//! # Collision resolution through perfect mergers
//!
//! When the integrator finds two bodies closer than the sum of their collision radii,
//! it hands the pair to a [`CollisionHandler`]. The default handler, [`PerfectMerger`],
//! replaces the pair with a single body that conserves:
//! - Total mass
//! - Total linear momentum
//! - Total volume, assuming equal densities
//!
//! The merged body takes the surviving slot; the other slot is returned to the
//! integrator for removal, and the current integration segment must halt because the
//! number of degrees of freedom changed. Nothing of the pre-merger state is kept.

use crate::{
    body::Body, constants::BodyIndex, stability_errors::StabilityError, system::SystemState,
};

/// Pair of colliding body indices as reported by the integrator.
///
/// No ordering between `i` and `j` is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub i: BodyIndex,
    pub j: BodyIndex,
}

/// Directive returned to the integrator after a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResponse {
    /// Slot holding the merged body, indexed before the removal
    pub survivor: BodyIndex,
    /// Slot the integrator must remove, if any
    pub remove: Option<BodyIndex>,
    /// Whether the integrator must stop the current segment
    pub halt: bool,
}

impl CollisionResponse {
    /// Remove the marked slot from `state`.
    pub fn apply_removal(&self, state: &mut SystemState) -> Result<(), StabilityError> {
        if let Some(index) = self.remove {
            state.remove(index)?;
        }
        Ok(())
    }

    /// Index of the merged body once the marked slot has been removed.
    pub fn survivor_after_removal(&self) -> BodyIndex {
        match self.remove {
            Some(removed) if removed < self.survivor => self.survivor - 1,
            _ => self.survivor,
        }
    }
}

/// Installable collision callback.
pub trait CollisionHandler {
    fn on_collision(
        &mut self,
        state: &mut SystemState,
        pair: CollisionPair,
    ) -> Result<CollisionResponse, StabilityError>;
}

/// Merge two bodies into one, conserving mass, momentum and volume.
///
/// * mass: `m = m_a + m_b`
/// * position, velocity: mass-weighted averages, so that `m v = m_a v_a + m_b v_b`
/// * radius: `r = (r_a³ + r_b³)^(1/3)`
///
/// Two massless bodies are averaged with equal weights.
pub fn merge_bodies(a: &Body, b: &Body) -> Body {
    let total_mass = a.mass + b.mass;
    let (wa, wb) = if total_mass > 0.0 {
        (a.mass / total_mass, b.mass / total_mass)
    } else {
        (0.5, 0.5)
    };

    Body {
        mass: total_mass,
        position: a.position * wa + b.position * wb,
        velocity: a.velocity * wa + b.velocity * wb,
        radius: (a.radius.powi(3) + b.radius.powi(3)).cbrt(),
    }
}

/// Resolve a collision between bodies `i` and `j` of `state`.
///
/// The merged body is written into slot `i` and slot `j` is marked for removal. When
/// `j` is the dominant body the roles are exchanged, so that index 0 always survives.
///
/// Errors
/// ------
/// * [`StabilityError::CollisionResolution`] if `i == j` or an index is out of range.
pub fn resolve(
    state: &mut SystemState,
    i: BodyIndex,
    j: BodyIndex,
) -> Result<CollisionResponse, StabilityError> {
    let n_bodies = state.len();
    if i == j || i >= n_bodies || j >= n_bodies {
        return Err(StabilityError::CollisionResolution { i, j, n_bodies });
    }

    let (survivor, removed) = if j == 0 { (j, i) } else { (i, j) };
    let bodies = state.bodies_mut();
    let merged = merge_bodies(&bodies[survivor], &bodies[removed]);
    bodies[survivor] = merged;

    log::debug!("merged body {removed} into body {survivor}");

    Ok(CollisionResponse {
        survivor,
        remove: Some(removed),
        halt: true,
    })
}

/// Perfect inelastic merger, the default collision handler.
#[derive(Debug, Clone, Default)]
pub struct PerfectMerger {
    merges: Vec<CollisionResponse>,
}

impl PerfectMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every merger resolved so far, in order.
    pub fn merges(&self) -> &[CollisionResponse] {
        &self.merges
    }

    pub fn into_merges(self) -> Vec<CollisionResponse> {
        self.merges
    }
}

impl CollisionHandler for PerfectMerger {
    fn on_collision(
        &mut self,
        state: &mut SystemState,
        pair: CollisionPair,
    ) -> Result<CollisionResponse, StabilityError> {
        let response = resolve(state, pair.i, pair.j)?;
        self.merges.push(response);
        Ok(response)
    }
}
