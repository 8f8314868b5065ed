use crate::engines::generation::ast::ExpressionTree;
use crate::error::{GepError, Result};
use serde::{Deserialize, Serialize};

/// One input/expected-output pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingCase {
    pub input: f64,
    pub expected: f64,
}

/// The cases every individual is scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    cases: Vec<TrainingCase>,
}

impl TrainingSet {
    pub fn new(inputs: &[f64], outputs: &[f64]) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(GepError::Dataset(format!(
                "{} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        let cases = inputs
            .iter()
            .zip(outputs)
            .map(|(&input, &expected)| TrainingCase { input, expected })
            .collect();
        Self::from_cases(cases)
    }

    pub fn from_cases(cases: Vec<TrainingCase>) -> Result<Self> {
        if cases.is_empty() {
            return Err(GepError::Dataset("Training set is empty".to_string()));
        }
        if let Some(i) = cases
            .iter()
            .position(|c| !c.input.is_finite() || !c.expected.is_finite())
        {
            return Err(GepError::Dataset(format!("Case {} is not finite", i)));
        }
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[TrainingCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Scores a decoded individual. Higher is better.
pub trait FitnessFunction {
    fn evaluate(&self, tree: &ExpressionTree) -> f64;

    /// Score of an exact fit. Reaching it ends a run.
    fn perfect_score(&self) -> f64;
}

impl<F: FitnessFunction + ?Sized> FitnessFunction for Box<F> {
    fn evaluate(&self, tree: &ExpressionTree) -> f64 {
        (**self).evaluate(tree)
    }

    fn perfect_score(&self) -> f64 {
        (**self).perfect_score()
    }
}

/// `max_fitness - Σ ((expected - f(x)) * scale)²`
#[derive(Debug, Clone)]
pub struct SquaredErrorFitness {
    training: TrainingSet,
    max_fitness: f64,
    scale: f64,
}

impl SquaredErrorFitness {
    pub fn new(training: TrainingSet, max_fitness: f64, scale: f64) -> Self {
        Self {
            training,
            max_fitness,
            scale,
        }
    }
}

impl FitnessFunction for SquaredErrorFitness {
    fn evaluate(&self, tree: &ExpressionTree) -> f64 {
        self.training.cases().iter().fold(self.max_fitness, |fitness, case| {
            let error = (case.expected - tree.evaluate(case.input)) * self.scale;
            fitness - error * error
        })
    }

    fn perfect_score(&self) -> f64 {
        self.max_fitness
    }
}

/// `Σ (max_fitness - |f(x) - expected|)`
#[derive(Debug, Clone)]
pub struct AbsoluteErrorFitness {
    training: TrainingSet,
    max_fitness: f64,
}

impl AbsoluteErrorFitness {
    pub fn new(training: TrainingSet, max_fitness: f64) -> Self {
        Self {
            training,
            max_fitness,
        }
    }
}

impl FitnessFunction for AbsoluteErrorFitness {
    fn evaluate(&self, tree: &ExpressionTree) -> f64 {
        self.training
            .cases()
            .iter()
            .map(|case| self.max_fitness - (tree.evaluate(case.input) - case.expected).abs())
            .sum()
    }

    fn perfect_score(&self) -> f64 {
        self.max_fitness * self.training.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::{decoder::KarvaDecoder, genome::GenomeSpec};
    use std::sync::Arc;

    fn identity_set() -> TrainingSet {
        TrainingSet::new(&[-1.0, 0.0, 1.0], &[-1.0, 0.0, 1.0]).unwrap()
    }

    fn decode(chromosome: &str) -> ExpressionTree {
        let spec = GenomeSpec::from_chars("a", "+-*/", 5, 2).unwrap();
        KarvaDecoder::new(Arc::new(spec))
            .decode(chromosome.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_training_set_validation() {
        assert!(TrainingSet::new(&[1.0], &[]).is_err());
        assert!(TrainingSet::new(&[], &[]).is_err());
        assert!(TrainingSet::new(&[f64::NAN], &[1.0]).is_err());
        assert_eq!(identity_set().len(), 3);
    }

    #[test]
    fn test_squared_error_exact_fit() {
        let fitness = SquaredErrorFitness::new(identity_set(), 0.0, 1.0);
        let tree = decode("aaaaaaaaaaa");
        assert_eq!(fitness.evaluate(&tree), 0.0);
        assert_eq!(fitness.perfect_score(), 0.0);
    }

    #[test]
    fn test_squared_error_penalises_misfit() {
        let fitness = SquaredErrorFitness::new(identity_set(), 10.0, 2.0);
        // (a * a): errors are -2, 0, 0 → scaled -4 → 16
        let tree = decode("*aaaaaaaaaa");
        assert_eq!(fitness.evaluate(&tree), 10.0 - 16.0);
    }

    #[test]
    fn test_absolute_error() {
        let fitness = AbsoluteErrorFitness::new(identity_set(), 5.0);
        assert_eq!(fitness.perfect_score(), 15.0);
        assert_eq!(fitness.evaluate(&decode("aaaaaaaaaaa")), 15.0);
        // (a + a): errors 1, 0, 1
        assert_eq!(fitness.evaluate(&decode("+aaaaaaaaaa")), 13.0);
    }

    #[test]
    fn test_boxed_fitness() {
        let boxed: Box<dyn FitnessFunction> =
            Box::new(SquaredErrorFitness::new(identity_set(), 0.0, 1.0));
        assert_eq!(boxed.evaluate(&decode("aaaaaaaaaaa")), 0.0);
    }
}
