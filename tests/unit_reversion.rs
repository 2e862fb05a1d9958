mod common;

use approx::assert_relative_eq;
use common::{planetary_system, ScriptedEvent, ScriptedIntegrator};
use stabsim::{
    constants::DPI,
    pipeline::{PipelineConfig, TrioPipeline},
    reduction::{
        revert::{revert_state, revert_units, RevertTarget},
        TrioSelection,
    },
    units::{LengthUnit, UnitSpec},
};

#[test]
fn test_reduced_outcome_reverts_to_physical_units() {
    // Innermost period of 0.1 yr around one solar mass
    let periods = [0.1, 0.15, 0.22];
    let state = planetary_system(3e-6, &periods);
    let mut integrator = ScriptedIntegrator::new(true, &[]);
    let pipeline = TrioPipeline::new(PipelineConfig::default(), &integrator).unwrap();

    let outcome = pipeline
        .run(state.clone(), &TrioSelection::new(&[1, 2, 3]).unwrap(), 50.0, &mut integrator)
        .unwrap();
    let anchors = outcome.anchors.unwrap();
    assert_relative_eq!(anchors.time, 0.1, max_relative = 1e-8);

    let target = RevertTarget::new(state.g, &UnitSpec::default()).unwrap();
    let reverted = revert_state(&outcome.reduced, &anchors.into(), &target).unwrap();

    assert_relative_eq!(reverted.t, 5.0, max_relative = 1e-8);
    assert_eq!(reverted.bodies()[0].mass, 1.0);
    for i in 1..state.len() {
        assert_relative_eq!(
            reverted.orbit(i).unwrap().semi_major_axis,
            state.orbit(i).unwrap().semi_major_axis,
            max_relative = 1e-9
        );
        assert_relative_eq!(reverted.bodies()[i].mass, 3e-6, max_relative = 1e-12);
    }
}

#[test]
fn test_batch_reversion_with_named_units() {
    let mut reduced = Vec::new();
    let mut mstars = Vec::new();
    let mut a1s = Vec::new();
    for mass in [1e-5, 3e-5] {
        let mut integrator =
            ScriptedIntegrator::new(false, &[ScriptedEvent::Collide { i: 1, j: 2 }]);
        let pipeline = TrioPipeline::new(PipelineConfig::default(), &integrator).unwrap();
        let outcome = pipeline
            .run(
                planetary_system(mass, &[1.0, 1.3, 1.8]),
                &TrioSelection::new(&[1, 2, 3]).unwrap(),
                10.0,
                &mut integrator,
            )
            .unwrap();
        let anchors = outcome.anchors.unwrap();
        mstars.push(anchors.mass);
        a1s.push(anchors.length);
        reduced.push(outcome.reduced);
    }

    let reverted = revert_units(
        &reduced,
        &mstars,
        &a1s,
        1.0,
        &UnitSpec::new("AU", "Msun", "yr"),
        None,
    )
    .unwrap();

    assert_eq!(reverted.len(), 2);
    for (state, source) in reverted.iter().zip(&reduced) {
        assert_eq!(state.len(), source.len());
        assert_eq!(state.t, 0.0);
        assert_eq!(state.units.map(|u| u.length), Some(LengthUnit::Au));
        assert_relative_eq!(state.g, DPI * DPI, max_relative = 1e-3);
    }
    assert_relative_eq!(reverted[1].bodies()[1].mass, 6e-5, max_relative = 1e-12);
}
