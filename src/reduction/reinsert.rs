use crate::{
    body::Body,
    frame::{apply_inverse, TransformationAngles},
    orbit::OrbitalElements,
    reduction::ReducedSystem,
    stability_errors::StabilityError,
    system::SystemState,
};

/// Write the survivors of an evolved reduced system back into the source state.
///
/// Survivors fill the selected slots in order; selected slots left without a survivor
/// are removed from the highest index down. The frame rotation is then undone and the
/// non-dominant bodies are reordered by semi-major axis.
///
/// Arguments
/// ---------
/// * `original`: the aligned state `reduced` was extracted from.
/// * `reduced`: evolved reduced system with its selection and anchors.
/// * `angles`: rotation used to align `original`.
///
/// Return
/// ------
/// * A new state in the pre-alignment frame. Bodies outside the selection keep their
///   Cartesian state. Each rewritten slot keeps its collision radius. Changes of the
///   reduced dominant body are not carried back.
///
/// Errors
/// ------
/// * [`StabilityError::InvalidSelection`] if the selection does not fit `original` or
///   if there are more survivors than selected slots.
/// * [`StabilityError::InvalidOrbit`] if a survivor has no defined orbit.
pub fn reinsert(
    original: &SystemState,
    reduced: &ReducedSystem,
    angles: &TransformationAngles,
) -> Result<SystemState, StabilityError> {
    let slots = reduced.selection.indices();
    reduced.selection.check_in(original)?;

    let survivors = survivors(reduced)?;
    if survivors.len() > slots.len() {
        return Err(StabilityError::InvalidSelection(format!(
            "{} survivors cannot fit into {} selected slots",
            survivors.len(),
            slots.len()
        )));
    }

    let mut state = original.clone();
    for (&slot, (mass, elements)) in slots.iter().zip(&survivors) {
        state.set_orbit(slot, *mass, elements)?;
    }
    for &slot in slots[survivors.len()..].iter().rev() {
        state.remove(slot)?;
    }

    log::debug!(
        "reinserted {} of {} selected bodies",
        survivors.len(),
        slots.len()
    );

    let state = apply_inverse(state, angles);
    order_by_semi_major_axis(state)
}

/// Mass and elements of every non-dominant body of the reduced state, in physical
/// units when the reduced system is normalized.
fn survivors(reduced: &ReducedSystem) -> Result<Vec<(f64, OrbitalElements)>, StabilityError> {
    let (mass_scale, length_scale) = reduced
        .anchors
        .map_or((1.0, 1.0), |anchors| (anchors.mass, anchors.length));

    reduced
        .state
        .bodies()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, body)| {
            let orbit = reduced.state.orbit(i)?;
            let elements = OrbitalElements {
                semi_major_axis: orbit.semi_major_axis * length_scale,
                ..orbit.elements()
            };
            Ok((body.mass * mass_scale, elements))
        })
        .collect()
}

/// Stable reorder of the non-dominant bodies by ascending semi-major axis.
///
/// Whole bodies move, collision radii included. Hyperbolic bodies (`a < 0`) come first.
pub fn order_by_semi_major_axis(mut state: SystemState) -> Result<SystemState, StabilityError> {
    let orbits = state.orbits()?;
    let mut keyed: Vec<(f64, Body)> = orbits
        .iter()
        .map(|o| o.semi_major_axis)
        .zip(state.bodies().iter().skip(1).copied())
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (slot, (_, body)) in state.bodies_mut().iter_mut().skip(1).zip(keyed) {
        *slot = body;
    }
    Ok(state)
}
