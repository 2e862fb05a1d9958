//! # Trio integration pipeline
//!
//! One end-to-end pass over a system:
//!
//! 1. configure and validate the full state,
//! 2. align it with its total angular momentum,
//! 3. extract the selected trio (normalized by default),
//! 4. configure the reduced system,
//! 5. integrate it to `t_end`, resuming after every merger until the segment completes,
//!    a body escapes or only the dominant body is left,
//! 6. reinsert the survivors into the full state and undo the rotation.
//!
//! Everything runs sequentially on owned states; the caller's state is consumed and a
//! new one is returned.

use serde::{Deserialize, Serialize};

use crate::{
    collision::{CollisionResponse, PerfectMerger},
    constants::BodyIndex,
    frame::align,
    integrator::{IntegrationStatus, Integrator},
    reduction::{extract::extract, reinsert::reinsert, ScaleAnchors, TrioSelection},
    setup::{EngineCapabilities, IntegratorConfigurer, SetupConfig},
    stability_errors::StabilityError,
    system::SystemState,
};

/// Options of a [`TrioPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub setup: SetupConfig,
    /// Integrate the trio in units where `a1 = M★ = P1 = 1`.
    pub normalize: bool,
    /// Maximum number of integration segments, one per merger plus the final one.
    pub max_segments: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            setup: SetupConfig::default(),
            normalize: true,
            max_segments: 64,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), StabilityError> {
        if self.max_segments == 0 {
            return Err(StabilityError::InvalidConfig(
                "max_segments must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Result of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrioOutcome {
    /// Full state with the survivors reinserted, in the caller's frame
    pub state: SystemState,
    /// Evolved reduced system, in reduced units
    pub reduced: SystemState,
    /// Scales of the reduced units, when normalized
    pub anchors: Option<ScaleAnchors>,
    /// Mergers in the order they happened, in reduced-system indices taken before each
    /// removal; see [`CollisionResponse::survivor_after_removal`]
    pub mergers: Vec<CollisionResponse>,
    /// Reduced-system index of a body that left the exit sphere
    pub escaped: Option<BodyIndex>,
}

impl TrioOutcome {
    pub fn is_stable(&self) -> bool {
        self.mergers.is_empty() && self.escaped.is_none()
    }
}

/// Runs trio integrations against one integrator.
#[derive(Debug, Clone, Copy)]
pub struct TrioPipeline {
    config: PipelineConfig,
    configurer: IntegratorConfigurer,
}

impl TrioPipeline {
    /// Build a pipeline, probing the integrator's capabilities once.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        config: PipelineConfig,
        integrator: &dyn Integrator,
    ) -> Result<Self, StabilityError> {
        config.validate()?;
        Ok(Self {
            config,
            configurer: IntegratorConfigurer::new(
                config.setup,
                EngineCapabilities::probe(integrator),
            ),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Integrate the `selection` of `state` up to `t_end`.
    ///
    /// `t_end` is in units of the innermost selected period when normalizing, in the
    /// time unit of `state` otherwise.
    ///
    /// Errors
    /// ------
    /// * [`StabilityError::InvalidConfig`] if `t_end` is not finite and positive.
    /// * [`StabilityError::Integration`] if the segment budget runs out.
    /// * Any error of the stages or of the integrator.
    pub fn run(
        &self,
        state: SystemState,
        selection: &TrioSelection,
        t_end: f64,
        integrator: &mut dyn Integrator,
    ) -> Result<TrioOutcome, StabilityError> {
        if !(t_end.is_finite() && t_end > 0.0) {
            return Err(StabilityError::InvalidConfig(format!(
                "t_end must be finite and positive, got {t_end}"
            )));
        }

        let state = self.configurer.configure(state)?;
        let (aligned, angles) = align(state)?;

        let mut reduced = extract(&aligned, selection, self.config.normalize)?;
        reduced.state = self.configurer.configure(reduced.state)?;

        let mut merger = PerfectMerger::new();
        let escaped = self.integrate(&mut reduced.state, t_end, integrator, &mut merger)?;
        let mergers = merger.into_merges();

        let state = reinsert(&aligned, &reduced, &angles)?;

        log::debug!(
            "trio {:?}: {} mergers, escaped {:?}, {} bodies left",
            selection.indices(),
            mergers.len(),
            escaped,
            state.len()
        );

        Ok(TrioOutcome {
            state,
            reduced: reduced.state,
            anchors: reduced.anchors,
            mergers,
            escaped,
        })
    }

    fn integrate(
        &self,
        state: &mut SystemState,
        t_end: f64,
        integrator: &mut dyn Integrator,
        merger: &mut PerfectMerger,
    ) -> Result<Option<BodyIndex>, StabilityError> {
        for _ in 0..self.config.max_segments {
            match integrator.integrate(state, t_end, merger)? {
                IntegrationStatus::Completed => return Ok(None),
                IntegrationStatus::Escaped { index } => return Ok(Some(index)),
                IntegrationStatus::Halted(_) if state.len() <= 1 => return Ok(None),
                IntegrationStatus::Halted(response) => {
                    log::debug!(
                        "segment halted at t = {} after merging into body {}",
                        state.t,
                        response.survivor_after_removal()
                    );
                }
            }
        }
        Err(StabilityError::Integration(format!(
            "no completion after {} segments",
            self.config.max_segments
        )))
    }
}

#[cfg(test)]
mod pipeline_test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.normalize);
        assert!(config.validate().is_ok());
        assert!(config.setup.megno);
    }

    #[test]
    fn test_zero_segment_budget_is_rejected() {
        let config = PipelineConfig {
            max_segments: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StabilityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_outcome_stability() {
        let outcome = TrioOutcome {
            state: SystemState::new(1.0),
            reduced: SystemState::new(1.0),
            anchors: None,
            mergers: vec![],
            escaped: None,
        };
        assert!(outcome.is_stable());
        assert!(!TrioOutcome {
            escaped: Some(2),
            ..outcome
        }
        .is_stable());
    }
}
