//! # Kepler's equation and anomaly conversions
//!
//! Newton solvers for the elliptic (`M = E − e sin E`) and hyperbolic
//! (`M = e sinh F − F`) forms of Kepler's equation, and the conversions between mean,
//! eccentric and true anomaly that the element conversions in [`crate::orbit`] need.

use std::f64::consts::PI;

use crate::constants::{Radian, DPI};

const MAX_ITER: usize = 100;
const TOLERANCE: f64 = 1e-15;

/// Principal value of an angle, in `[0, 2π)`.
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Principal difference `a − b`, in `[-π, π]`.
pub fn angle_diff(a: Radian, b: Radian) -> Radian {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve the elliptic Kepler equation `M = E − e sin E` for the eccentric anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: `M` in radians (any range).
/// * `eccentricity`: `0 ≤ e < 1`.
///
/// Return
/// ------
/// * `E` such that `E − M` lies in `[-π, π]` around the principal mean anomaly.
pub fn solve_elliptic(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    let m = angle_diff(mean_anomaly, 0.0);

    // Starting guess robust up to e → 1
    let mut ecc_anomaly = if eccentricity > 0.8 {
        PI.copysign(m)
    } else {
        m + eccentricity * m.sin()
    };

    for _ in 0..MAX_ITER {
        let f = ecc_anomaly - eccentricity * ecc_anomaly.sin() - m;
        let f_prime = 1.0 - eccentricity * ecc_anomaly.cos();
        let delta = f / f_prime;
        ecc_anomaly -= delta;

        if delta.abs() < TOLERANCE * (1.0 + ecc_anomaly.abs()) {
            break;
        }
    }

    ecc_anomaly
}

/// Solve the hyperbolic Kepler equation `M = e sinh F − F` for the hyperbolic anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: hyperbolic mean anomaly `M` (unbounded).
/// * `eccentricity`: `e > 1`.
pub fn solve_hyperbolic(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let m = mean_anomaly;
    let mut hyp_anomaly = if m.abs() < 6.0 * eccentricity {
        (m / eccentricity).asinh()
    } else {
        (2.0 * m.abs() / eccentricity + 1.8).ln().copysign(m)
    };

    for _ in 0..MAX_ITER {
        let f = eccentricity * hyp_anomaly.sinh() - hyp_anomaly - m;
        let f_prime = eccentricity * hyp_anomaly.cosh() - 1.0;
        let delta = f / f_prime;
        hyp_anomaly -= delta;

        if delta.abs() < TOLERANCE * (1.0 + hyp_anomaly.abs()) {
            break;
        }
    }

    hyp_anomaly
}

/// True anomaly from mean anomaly, for elliptic (`e < 1`) or hyperbolic (`e > 1`) orbits.
pub fn true_from_mean(mean_anomaly: f64, eccentricity: f64) -> Radian {
    if eccentricity < 1.0 {
        let ecc_anomaly = solve_elliptic(mean_anomaly, eccentricity);
        let beta = (1.0 - eccentricity * eccentricity).sqrt();
        (beta * ecc_anomaly.sin()).atan2(ecc_anomaly.cos() - eccentricity)
    } else {
        let hyp_anomaly = solve_hyperbolic(mean_anomaly, eccentricity);
        let beta = (eccentricity * eccentricity - 1.0).sqrt();
        (beta * hyp_anomaly.sinh()).atan2(eccentricity - hyp_anomaly.cosh())
    }
}

/// Mean anomaly from true anomaly, for elliptic (`e < 1`) or hyperbolic (`e > 1`) orbits.
pub fn mean_from_true(true_anomaly: Radian, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        let beta = (1.0 - eccentricity * eccentricity).sqrt();
        let ecc_anomaly =
            (beta * true_anomaly.sin()).atan2(eccentricity + true_anomaly.cos());
        ecc_anomaly - eccentricity * ecc_anomaly.sin()
    } else {
        let beta = (eccentricity * eccentricity - 1.0).sqrt();
        let sinh_f = beta * true_anomaly.sin() / (1.0 + eccentricity * true_anomaly.cos());
        let hyp_anomaly = sinh_f.asinh();
        eccentricity * hyp_anomaly.sinh() - hyp_anomaly
    }
}
