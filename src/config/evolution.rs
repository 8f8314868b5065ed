use super::traits::{check_probability, ConfigSection};
use crate::engines::generation::population::OperatorRates;
use crate::error::GepError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    pub crossover_one_point_rate: f64,
    pub crossover_two_point_rate: f64,
    pub is_transposition_rate: f64,
    pub ris_transposition_rate: f64,
    /// Keep the elite copy in slot 0 out of reach of the operators.
    pub preserve_elite: bool,
    pub hall_of_fame_size: usize,
    pub seed: Option<u64>,
    pub selection_method: SelectionMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Uniform pick from the best `cutoff` fraction of the ranking.
    Truncation { cutoff: f64 },
    /// Best of `size` uniform picks.
    Tournament { size: usize },
    /// Fitness-proportional pick over the whole population.
    Roulette,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::Truncation { cutoff: 0.5 }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            max_generations: 2000,
            mutation_rate: 0.3,
            crossover_one_point_rate: 0.34,
            crossover_two_point_rate: 0.0,
            is_transposition_rate: 0.0,
            ris_transposition_rate: 0.0,
            preserve_elite: true,
            hall_of_fame_size: 10,
            seed: None,
            selection_method: SelectionMethod::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn operator_rates(&self) -> OperatorRates {
        OperatorRates {
            mutation: self.mutation_rate,
            crossover_one_point: self.crossover_one_point_rate,
            crossover_two_point: self.crossover_two_point_rate,
            is_transposition: self.is_transposition_rate,
            ris_transposition: self.ris_transposition_rate,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GepError> {
        if self.population_size == 0 {
            return Err(GepError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(GepError::Configuration(
                "At least one generation is required".to_string(),
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(GepError::Configuration(
                "Hall of fame size must be positive".to_string(),
            ));
        }
        check_probability("Mutation rate", self.mutation_rate)?;
        check_probability("One-point crossover rate", self.crossover_one_point_rate)?;
        check_probability("Two-point crossover rate", self.crossover_two_point_rate)?;
        check_probability("IS transposition rate", self.is_transposition_rate)?;
        check_probability("RIS transposition rate", self.ris_transposition_rate)?;

        match self.selection_method {
            SelectionMethod::Truncation { cutoff } => {
                if !(cutoff > 0.0 && cutoff <= 1.0) {
                    return Err(GepError::Configuration(
                        "Truncation cutoff must be in (0, 1]".to_string(),
                    ));
                }
            }
            SelectionMethod::Tournament { size } => {
                if size == 0 {
                    return Err(GepError::Configuration(
                        "Tournament size must be positive".to_string(),
                    ));
                }
            }
            SelectionMethod::Roulette => {}
        }
        Ok(())
    }
}
