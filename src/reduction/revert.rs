//! # Back to physical units
//!
//! Normalized reduced states live in units where `a1 = M★ = 1` and `G = 4π²`. The
//! functions here rebuild states in the caller's units from the anchors captured at
//! extraction.

use itertools::izip;

use crate::{
    orbit::OrbitalElements,
    reduction::{check_anchor, ScaleAnchors},
    stability_errors::StabilityError,
    system::SystemState,
    units::{UnitSpec, UnitSystem},
};

/// Scales of one reduced state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevertAnchors {
    /// Dominant mass `M★`
    pub mass: f64,
    /// Semi-major axis `a1`
    pub length: f64,
    /// Period `P1`; without it the reverted time is reset to zero
    pub period: Option<f64>,
}

impl RevertAnchors {
    fn check(&self) -> Result<(), StabilityError> {
        check_anchor("mass", self.mass)?;
        check_anchor("length", self.length)?;
        self.period.map_or(Ok(()), |p| check_anchor("time", p))
    }
}

impl From<ScaleAnchors> for RevertAnchors {
    fn from(anchors: ScaleAnchors) -> Self {
        Self {
            mass: anchors.mass,
            length: anchors.length,
            period: Some(anchors.time),
        }
    }
}

/// Gravitational constant and unit system of the reverted states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevertTarget {
    pub g: f64,
    pub units: Option<UnitSystem>,
}

impl RevertTarget {
    /// Use `g` as is, unless `units` names all of length, mass and time: `g` is then
    /// the gravitational constant expressed in that unit system.
    pub fn new(g: f64, units: &UnitSpec) -> Result<Self, StabilityError> {
        Ok(match units.resolve()? {
            Some(system) => Self {
                g: system.gravitational_constant(),
                units: Some(system),
            },
            None => Self { g, units: None },
        })
    }
}

/// Rebuild one reduced state in physical units.
///
/// The dominant body gets mass `M★` at rest at the origin. Every other body gets
/// `m·M★`, `a·a1` and radius `r·a1`; `e`, `inc`, `ϖ`, `Ω` and the true longitude are
/// unchanged.
pub fn revert_state(
    state: &SystemState,
    anchors: &RevertAnchors,
    target: &RevertTarget,
) -> Result<SystemState, StabilityError> {
    anchors.check()?;

    let mut reverted = SystemState::new(target.g);
    reverted.units = target.units;
    reverted.add_primary(anchors.mass);

    for (i, body) in state.bodies().iter().enumerate().skip(1) {
        let orbit = state.orbit(i)?;
        let elements = OrbitalElements {
            semi_major_axis: orbit.semi_major_axis * anchors.length,
            ..orbit.elements_with_true_longitude()
        };
        let slot = reverted.add_orbiting(body.mass * anchors.mass, &elements)?;
        reverted.bodies_mut()[slot].radius = body.radius * anchors.length;
    }

    reverted.t = anchors.period.map_or(0.0, |p| state.t * p);
    Ok(reverted)
}

/// Rebuild a batch of reduced states in physical units.
///
/// Arguments
/// ---------
/// * `states`: normalized reduced states.
/// * `mstars`, `a1s`: per-state dominant masses and innermost semi-major axes.
/// * `g`: gravitational constant used when `units` is incomplete.
/// * `units`: unit names of the caller.
/// * `p1s`: per-state innermost periods; when absent every time is reset to zero.
///
/// Errors
/// ------
/// * [`StabilityError::UnitConversion`] for unknown unit names, anchor slices whose
///   length differs from `states`, or non-finite or non-positive anchors. The first
///   failing entry fails the whole batch.
pub fn revert_units(
    states: &[SystemState],
    mstars: &[f64],
    a1s: &[f64],
    g: f64,
    units: &UnitSpec,
    p1s: Option<&[f64]>,
) -> Result<Vec<SystemState>, StabilityError> {
    let n = states.len();
    let lengths_match = mstars.len() == n && a1s.len() == n && p1s.map_or(true, |p| p.len() == n);
    if !lengths_match {
        return Err(StabilityError::UnitConversion(format!(
            "anchor counts (mass {}, length {}, time {:?}) do not match {n} states",
            mstars.len(),
            a1s.len(),
            p1s.map(<[f64]>::len)
        )));
    }

    let target = RevertTarget::new(g, units)?;
    let periods: Vec<Option<f64>> = match p1s {
        Some(p1s) => p1s.iter().copied().map(Some).collect(),
        None => vec![None; n],
    };

    izip!(states, mstars, a1s, periods)
        .map(|(state, &mass, &length, period)| {
            revert_state(
                state,
                &RevertAnchors {
                    mass,
                    length,
                    period,
                },
                &target,
            )
        })
        .collect()
}
