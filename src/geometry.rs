//! # Rotations of 3-vectors
//!
//! Elementary axis rotations and the `(Ω, I, ω)` Euler-angle transform used both to
//! place a perifocal orbit in space and to align a whole system with its angular
//! momentum.
//!
//! All rotations here are **active**: they rotate the vector inside a fixed frame,
//! they do not change the basis.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;

/// Cartesian axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Build the right-handed rotation matrix about one Cartesian axis.
///
/// Arguments
/// ---------
/// * `axis`: the rotation axis.
/// * `alpha`: rotation angle in radians (counter-clockwise looking down the axis).
///
/// Return
/// ------
/// * A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
///
/// See also
/// --------
/// * [`euler_angles_matrix`] – composition of three elementary rotations.
pub fn rotation_about(axis: Axis, alpha: Radian) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation matrix of the `(Ω, I, ω)` Euler sequence.
///
/// The vector is rotated about z by `omega`, then about x by `inclination`, then about
/// z by `node`: `R = Rz(Ω) · Rx(I) · Rz(ω)`.
///
/// With `(Ω, I, ω)` set to the longitude of node, inclination and argument of
/// pericenter, this maps the perifocal frame onto the reference frame.
pub fn euler_angles_matrix(node: Radian, inclination: Radian, omega: Radian) -> Matrix3<f64> {
    rotation_about(Axis::Z, node)
        * rotation_about(Axis::X, inclination)
        * rotation_about(Axis::Z, omega)
}

/// Transform one vector with the `(Ω, I, ω)` Euler sequence.
///
/// The inverse of `euler_angles_transform(v, Ω, I, ω)` is
/// `euler_angles_transform(v, -ω, -I, -Ω)`.
pub fn euler_angles_transform(
    v: &Vector3<f64>,
    node: Radian,
    inclination: Radian,
    omega: Radian,
) -> Vector3<f64> {
    euler_angles_matrix(node, inclination, omega) * v
}
