use thiserror::Error;

use crate::constants::BodyIndex;

/// Pre-integration invariant violations on a [`crate::system::SystemState`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Body {index} has a non-finite mass: {mass}")]
    NonFiniteMass { index: BodyIndex, mass: f64 },

    #[error("Body {index} has a negative mass: {mass}")]
    NegativeMass { index: BodyIndex, mass: f64 },

    #[error(
        "Body at index 0 must be the dominant mass, but body {index} has mass {mass} > {primary_mass}"
    )]
    NonDominantPrimary {
        index: BodyIndex,
        mass: f64,
        primary_mass: f64,
    },

    #[error("System has no dominant body")]
    EmptySystem,
}

#[derive(Error, Debug, Clone)]
pub enum StabilityError {
    #[error("Invalid system state: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid subsystem selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid collision pair ({i}, {j}) in a system of {n_bodies} bodies")]
    CollisionResolution {
        i: BodyIndex,
        j: BodyIndex,
        n_bodies: usize,
    },

    #[error("Unit conversion failed: {0}")]
    UnitConversion(String),

    #[error("Total angular momentum vanishes; frame alignment is undefined")]
    DegenerateAngularMomentum,

    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),

    #[error("Integrator failure: {0}")]
    Integration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PartialEq for StabilityError {
    fn eq(&self, other: &Self) -> bool {
        use StabilityError::*;
        match (self, other) {
            (Validation(a), Validation(b)) => a == b,
            (InvalidSelection(a), InvalidSelection(b)) => a == b,
            (
                CollisionResolution {
                    i: i1,
                    j: j1,
                    n_bodies: n1,
                },
                CollisionResolution {
                    i: i2,
                    j: j2,
                    n_bodies: n2,
                },
            ) => i1 == i2 && j1 == j2 && n1 == n2,
            (UnitConversion(a), UnitConversion(b)) => a == b,
            (InvalidOrbit(a), InvalidOrbit(b)) => a == b,
            (Integration(a), Integration(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            (DegenerateAngularMomentum, DegenerateAngularMomentum) => true,

            _ => false,
        }
    }
}
