use crate::{stability_errors::ValidationError, system::SystemState};

/// Check the pre-integration invariants of a state.
///
/// Pure check: the state is handed back unchanged on success, so calls can be chained
/// and `validate(validate(s)?)` is identical to `validate(s)`.
///
/// Errors
/// ------
/// * [`ValidationError::EmptySystem`] if there is no body at all.
/// * [`ValidationError::NonFiniteMass`] for the first body with a NaN or infinite mass.
/// * [`ValidationError::NegativeMass`] for the first body with a negative mass.
/// * [`ValidationError::NonDominantPrimary`] if a body is heavier than body 0.
pub fn validate(state: SystemState) -> Result<SystemState, ValidationError> {
    check(&state)?;
    Ok(state)
}

/// Borrowing form of [`validate`].
pub fn check(state: &SystemState) -> Result<(), ValidationError> {
    let bodies = state.bodies();
    let primary = bodies.first().ok_or(ValidationError::EmptySystem)?;

    if let Some((index, body)) = bodies.iter().enumerate().find(|(_, b)| !b.mass.is_finite()) {
        return Err(ValidationError::NonFiniteMass {
            index,
            mass: body.mass,
        });
    }

    if let Some((index, body)) = bodies.iter().enumerate().find(|(_, b)| b.mass < 0.0) {
        return Err(ValidationError::NegativeMass {
            index,
            mass: body.mass,
        });
    }

    if let Some((index, body)) = bodies
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, b)| b.mass > primary.mass)
    {
        return Err(ValidationError::NonDominantPrimary {
            index,
            mass: body.mass,
            primary_mass: primary.mass,
        });
    }

    Ok(())
}
