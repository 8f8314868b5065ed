use super::traits::ConfigSection;
use crate::engines::evaluation::fitness::{
    AbsoluteErrorFitness, FitnessFunction, SquaredErrorFitness, TrainingSet,
};
use crate::error::GepError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessKind {
    SquaredError,
    AbsoluteError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub kind: FitnessKind,
    pub max_fitness: f64,
    /// Multiplier applied to each error before squaring.
    pub error_scale: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            kind: FitnessKind::SquaredError,
            max_fitness: 4000.0,
            error_scale: 100.0,
        }
    }
}

impl FitnessConfig {
    pub fn build(&self, training: TrainingSet) -> Box<dyn FitnessFunction> {
        match self.kind {
            FitnessKind::SquaredError => Box::new(SquaredErrorFitness::new(
                training,
                self.max_fitness,
                self.error_scale,
            )),
            FitnessKind::AbsoluteError => {
                Box::new(AbsoluteErrorFitness::new(training, self.max_fitness))
            }
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), GepError> {
        if !self.max_fitness.is_finite() {
            return Err(GepError::Configuration(
                "Max fitness must be finite".to_string(),
            ));
        }
        if !(self.error_scale.is_finite() && self.error_scale > 0.0) {
            return Err(GepError::Configuration(
                "Error scale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
