//! # Trio reduction
//!
//! A short integration of the whole system is wasteful when only a few adjacent bodies
//! matter. This module cuts a sub-system of at most three non-dominant bodies out of a
//! [`SystemState`], optionally normalized to `a1 = M★ = P1 = 1`, and puts the evolved
//! survivors back afterwards.
//!
//! ```text
//!  state ──align──▶ aligned ──extract──▶ ReducedSystem ──integrate──▶ evolved
//!                      │                                                 │
//!                      └──────────────────reinsert◀──────────────────────┘
//! ```
//!
//! * [`extract`](extract::extract) builds the reduced system and captures the
//!   [`ScaleAnchors`] before any integration.
//! * [`reinsert`](reinsert::reinsert) writes the survivors back into the aligned
//!   original and undoes the frame rotation.
//! * [`revert`] converts reduced states back to physical units.

pub mod extract;
pub mod reinsert;
pub mod revert;

use serde::{Deserialize, Serialize};

use crate::{constants::BodyIndex, stability_errors::StabilityError, system::SystemState};

/// Maximum number of bodies in a reduced sub-system, dominant body excluded.
pub const MAX_SELECTION: usize = 3;

/// Strictly ascending indices of 1 to 3 non-dominant bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BodyIndex>", into = "Vec<BodyIndex>")]
pub struct TrioSelection {
    indices: Vec<BodyIndex>,
}

impl TrioSelection {
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidSelection`] if the selection is empty, longer than
    ///   three, names the dominant body, or is not strictly ascending.
    pub fn new(indices: &[BodyIndex]) -> Result<Self, StabilityError> {
        if indices.is_empty() || indices.len() > MAX_SELECTION {
            return Err(StabilityError::InvalidSelection(format!(
                "expected 1 to {MAX_SELECTION} indices, got {}",
                indices.len()
            )));
        }
        if indices.contains(&0) {
            return Err(StabilityError::InvalidSelection(
                "index 0 is the dominant body and cannot be selected".into(),
            ));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StabilityError::InvalidSelection(format!(
                "indices {indices:?} are not strictly ascending"
            )));
        }
        Ok(Self {
            indices: indices.to_vec(),
        })
    }

    /// Every adjacent trio `[i, i+1, i+2]` of a system of `n_bodies` bodies.
    pub fn adjacent(n_bodies: usize) -> Vec<Self> {
        (1..n_bodies.saturating_sub(2))
            .map(|i| Self {
                indices: vec![i, i + 1, i + 2],
            })
            .collect()
    }

    pub fn indices(&self) -> &[BodyIndex] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Lowest selected index, whose orbit sets the normalization.
    pub fn first(&self) -> BodyIndex {
        self.indices[0]
    }

    /// Check that every index exists in `state`.
    pub fn check_in(&self, state: &SystemState) -> Result<(), StabilityError> {
        match self.indices.iter().find(|&&i| i >= state.len()) {
            Some(index) => Err(StabilityError::InvalidSelection(format!(
                "index {index} out of range for a system of {} bodies",
                state.len()
            ))),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<BodyIndex>> for TrioSelection {
    type Error = StabilityError;

    fn try_from(indices: Vec<BodyIndex>) -> Result<Self, Self::Error> {
        Self::new(&indices)
    }
}

impl From<TrioSelection> for Vec<BodyIndex> {
    fn from(selection: TrioSelection) -> Self {
        selection.indices
    }
}

/// Physical scales captured at extraction, before any integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleAnchors {
    /// Dominant mass `M★`
    pub mass: f64,
    /// Semi-major axis `a1` of the lowest selected body
    pub length: f64,
    /// Orbital period `P1` of the lowest selected body
    pub time: f64,
}

impl ScaleAnchors {
    /// Errors
    /// ------
    /// * [`StabilityError::UnitConversion`] if an anchor is not finite and positive.
    pub fn new(mass: f64, length: f64, time: f64) -> Result<Self, StabilityError> {
        for (name, value) in [("mass", mass), ("length", length), ("time", time)] {
            check_anchor(name, value)?;
        }
        Ok(Self { mass, length, time })
    }
}

pub(crate) fn check_anchor(name: &str, value: f64) -> Result<(), StabilityError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StabilityError::UnitConversion(format!(
            "{name} anchor must be finite and positive, got {value}"
        )))
    }
}

/// A sub-system cut out of a larger state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedSystem {
    pub state: SystemState,
    /// Slots of the source state the bodies came from
    pub selection: TrioSelection,
    /// Present iff the reduced state is normalized
    pub anchors: Option<ScaleAnchors>,
}

#[cfg(test)]
mod reduction_test {
    use super::*;
    use crate::system::system_test::three_planet_system;

    #[test]
    fn test_valid_selections() {
        assert_eq!(TrioSelection::new(&[1, 2, 3]).unwrap().indices(), &[1, 2, 3]);
        assert_eq!(TrioSelection::new(&[2, 5]).unwrap().first(), 2);
        assert_eq!(TrioSelection::new(&[4]).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_selections() {
        for indices in [&[][..], &[0, 1, 2], &[1, 1, 2], &[3, 2, 1], &[1, 2, 3, 4]] {
            assert!(
                matches!(
                    TrioSelection::new(indices),
                    Err(StabilityError::InvalidSelection(_))
                ),
                "{indices:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_out_of_range_selection() {
        let state = three_planet_system();
        assert!(TrioSelection::new(&[1, 2, 3]).unwrap().check_in(&state).is_ok());
        assert!(TrioSelection::new(&[2, 3, 4]).unwrap().check_in(&state).is_err());
    }

    #[test]
    fn test_adjacent_trios() {
        let trios = TrioSelection::adjacent(6);
        let indices: Vec<_> = trios.iter().map(|t| t.indices().to_vec()).collect();
        assert_eq!(indices, vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4, 5]]);
        assert!(TrioSelection::adjacent(3).is_empty());
        assert!(TrioSelection::adjacent(0).is_empty());
    }

    #[test]
    fn test_anchors_must_be_positive() {
        assert!(ScaleAnchors::new(1.0, 0.1, 0.03).is_ok());
        assert!(matches!(
            ScaleAnchors::new(1.0, -0.1, 0.03),
            Err(StabilityError::UnitConversion(_))
        ));
        assert!(ScaleAnchors::new(f64::NAN, 0.1, 0.03).is_err());
        assert!(ScaleAnchors::new(1.0, 0.1, f64::INFINITY).is_err());
    }
}
