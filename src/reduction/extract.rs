use crate::{
    constants::NORMALIZED_G,
    orbit::OrbitalElements,
    reduction::{ReducedSystem, ScaleAnchors, TrioSelection},
    stability_errors::StabilityError,
    system::SystemState,
};

/// Cut the selected bodies out of `state` around a fresh dominant body.
///
/// The reduced state holds a dominant body at rest at the origin followed by the
/// selected bodies in their original relative order, each placed on its osculating
/// orbit around the source dominant body (true longitude kept).
///
/// Arguments
/// ---------
/// * `state`: source state, usually aligned with its angular momentum.
/// * `selection`: slots to extract.
/// * `normalize`: rescale to `a1 = M★ = 1` with `G = 4π²`, so that `P1 ≈ 1`.
///
/// Return
/// ------
/// * A [`ReducedSystem`]; its anchors are captured here, before any integration, and
///   are present only when `normalize` is set.
///
/// Errors
/// ------
/// * [`StabilityError::InvalidSelection`] if an index is out of range.
/// * [`StabilityError::InvalidOrbit`] if a selected body has no defined orbit.
/// * [`StabilityError::UnitConversion`] if normalizing around a non-positive scale
///   (a hyperbolic innermost body or a massless dominant body).
pub fn extract(
    state: &SystemState,
    selection: &TrioSelection,
    normalize: bool,
) -> Result<ReducedSystem, StabilityError> {
    selection.check_in(state)?;
    let primary_mass = state.primary().map_or(0.0, |p| p.mass);

    let orbits = selection
        .indices()
        .iter()
        .map(|&i| state.orbit(i))
        .collect::<Result<Vec<_>, _>>()?;

    let anchors = if normalize {
        let first = &orbits[0];
        Some(ScaleAnchors::new(
            primary_mass,
            first.semi_major_axis,
            first.period,
        )?)
    } else {
        None
    };

    let (g, mass_scale, length_scale) = match &anchors {
        Some(anchors) => (NORMALIZED_G, anchors.mass, anchors.length),
        None => (state.g, 1.0, 1.0),
    };

    let mut reduced = SystemState::new(g);
    if anchors.is_none() {
        reduced.units = state.units;
    }
    reduced.add_primary(primary_mass / mass_scale);

    for (&index, orbit) in selection.indices().iter().zip(&orbits) {
        let source = &state.bodies()[index];
        let elements = OrbitalElements {
            semi_major_axis: orbit.semi_major_axis / length_scale,
            ..orbit.elements_with_true_longitude()
        };
        let slot = reduced.add_orbiting(source.mass / mass_scale, &elements)?;
        reduced.bodies_mut()[slot].radius = source.radius / length_scale;
    }

    log::debug!(
        "extracted bodies {:?} (normalized: {normalize})",
        selection.indices()
    );

    Ok(ReducedSystem {
        state: reduced,
        selection: selection.clone(),
        anchors,
    })
}
