use time::Date;

use super::climate;
use super::phase::PhaseModel;
use super::types::AxisDetails;
use crate::config::ScoringConfig;
use crate::cycles::repo_types::CycleInterval;
use crate::environment::repo_types::EnvironmentSample;
use crate::profile::repo_types::CycleProfile;
use crate::records::repo_types::DailyInput;

const NEUTRAL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub composite_score: i32,
    pub axis_details: AxisDetails,
}

/// Stateless: every output is a function of the arguments alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeScorer {
    pub phase: PhaseModel,
}

impl CompositeScorer {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            phase: PhaseModel {
                default_menstruation_days: config.default_menstruation_days,
            },
        }
    }

    pub fn score(
        &self,
        input: &DailyInput,
        environment: Option<&EnvironmentSample>,
        profile: Option<&CycleProfile>,
        last_cycle: Option<&CycleInterval>,
        target: Date,
    ) -> ScoreOutcome {
        let skin_condition = input.skin_condition.unwrap_or(NEUTRAL);
        let axis_details = AxisDetails {
            sleep: input.sleep.unwrap_or(NEUTRAL),
            stress: input.stress.unwrap_or(NEUTRAL),
            skincare_effort: input.skincare_effort.unwrap_or(NEUTRAL),
            menstrual: self.phase.score(target, last_cycle, profile),
            climate: climate::sample_score(environment),
            skin_condition,
        };

        // The published score tracks the self-rated skin condition only;
        // the other axes are diagnostic.
        ScoreOutcome {
            composite_score: i32::from(skin_condition) * 20,
            axis_details,
        }
    }
}
