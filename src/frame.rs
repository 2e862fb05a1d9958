//! # Angular momentum frame
//!
//! Rotating a system so that its total angular momentum points along +z makes the
//! reference plane the invariable plane: inclinations measured after alignment are
//! mutual inclinations with respect to that plane.
//!
//! The rotation is described by two angles derived from the normalized angular
//! momentum `Ĝ`:
//!
//! * `θ1 = π/2 − atan2(Ĝy, Ĝx)` brings `Ĝ` into the y–z plane by a rotation about z,
//! * `θ2 = π/2 − atan2(Ĝz, √(1 − Ĝz²))` then tilts it onto +z by a rotation about x.
//!
//! Angles are recomputed for every state and never cached.

use nalgebra::Vector3;

use crate::{
    constants::Radian, geometry::euler_angles_transform, stability_errors::StabilityError,
    system::SystemState,
};

use std::f64::consts::FRAC_PI_2;

/// Rotation angles mapping a system's angular momentum onto +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformationAngles {
    pub theta1: Radian,
    pub theta2: Radian,
}

impl TransformationAngles {
    /// Angles for a given angular momentum vector.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::DegenerateAngularMomentum`] if `angular_momentum` is zero or
    ///   not finite, since the target plane is then undefined.
    pub fn from_angular_momentum(angular_momentum: &Vector3<f64>) -> Result<Self, StabilityError> {
        let norm = angular_momentum.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(StabilityError::DegenerateAngularMomentum);
        }
        let g = angular_momentum / norm;
        let horizontal = (1.0 - g.z * g.z).max(0.0).sqrt();

        Ok(Self {
            theta1: FRAC_PI_2 - g.y.atan2(g.x),
            theta2: FRAC_PI_2 - g.z.atan2(horizontal),
        })
    }

    /// Forward rotation: about z by `theta1`, then about x by `theta2`.
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        euler_angles_transform(v, 0.0, self.theta2, self.theta1)
    }

    /// Inverse rotation: negated angles in reversed order.
    pub fn rotate_inverse(&self, v: &Vector3<f64>) -> Vector3<f64> {
        euler_angles_transform(v, -self.theta1, -self.theta2, 0.0)
    }
}

/// Angles aligning the total angular momentum of `state` with +z.
pub fn compute_angles(state: &SystemState) -> Result<TransformationAngles, StabilityError> {
    TransformationAngles::from_angular_momentum(&state.total_angular_momentum())
}

/// Rotate every position and velocity of `state` with the forward rotation.
pub fn apply(mut state: SystemState, angles: &TransformationAngles) -> SystemState {
    for body in state.bodies_mut() {
        body.position = angles.rotate(&body.position);
        body.velocity = angles.rotate(&body.velocity);
    }
    state
}

/// Undo [`apply`].
pub fn apply_inverse(mut state: SystemState, angles: &TransformationAngles) -> SystemState {
    for body in state.bodies_mut() {
        body.position = angles.rotate_inverse(&body.position);
        body.velocity = angles.rotate_inverse(&body.velocity);
    }
    state
}

/// Compute the alignment angles of `state` and apply them.
///
/// Return
/// ------
/// * The rotated state and the angles needed to rotate it back with [`apply_inverse`].
pub fn align(state: SystemState) -> Result<(SystemState, TransformationAngles), StabilityError> {
    let angles = compute_angles(&state)?;
    log::debug!(
        "aligning angular momentum: theta1 = {:.6}, theta2 = {:.6}",
        angles.theta1,
        angles.theta2
    );
    Ok((apply(state, &angles), angles))
}
