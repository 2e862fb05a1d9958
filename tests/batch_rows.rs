mod common;

use common::{planetary_system, ScriptedIntegrator};
use stabsim::{
    batch::{run_trio_batch, BatchSummary, RowOutcome},
    pipeline::PipelineConfig,
    reduction::TrioSelection,
    stability_errors::{StabilityError, ValidationError},
};

#[test]
fn test_failing_rows_are_isolated() {
    let mut rows = Vec::new();
    for k in 0..8 {
        let state = planetary_system(1e-5 * (k + 1) as f64, &[1.0, 1.5, 2.1, 3.0]);
        rows.push((state, TrioSelection::new(&[1, 2, 3]).unwrap()));
    }
    // Body 5 does not exist in a five-body system
    rows[2].1 = TrioSelection::new(&[3, 4, 5]).unwrap();
    // A body heavier than the dominant one
    rows[5].0.bodies_mut()[3].mass = 2.0;

    let outcomes = run_trio_batch(PipelineConfig::default(), rows, 20.0, || {
        ScriptedIntegrator::new(true, &[])
    });

    assert_eq!(outcomes.len(), 8);
    assert!(matches!(
        outcomes[2],
        RowOutcome::Failed {
            row: 2,
            error: StabilityError::InvalidSelection(_)
        }
    ));
    assert_eq!(
        outcomes[5].error(),
        Some(&StabilityError::Validation(ValidationError::NonDominantPrimary {
            index: 3,
            mass: 2.0,
            primary_mass: 1.0
        }))
    );

    for (row, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.row(), row);
        if let Some(value) = outcome.value() {
            assert!(value.is_stable());
            assert_eq!(value.state.len(), 5);
        }
    }

    assert_eq!(
        BatchSummary::from_outcomes(&outcomes),
        BatchSummary {
            completed: 6,
            failed: 2
        }
    );
}

#[test]
fn test_every_adjacent_trio_of_a_system() {
    let state = planetary_system(1e-5, &[1.0, 1.4, 2.0, 2.8, 4.0]);
    let rows: Vec<_> = TrioSelection::adjacent(state.len())
        .into_iter()
        .map(|selection| (state.clone(), selection))
        .collect();
    assert_eq!(rows.len(), 3);

    let outcomes = run_trio_batch(PipelineConfig::default(), rows, 20.0, || {
        ScriptedIntegrator::new(false, &[])
    });
    assert!(outcomes.iter().all(|o| o.value().is_some()));
}
