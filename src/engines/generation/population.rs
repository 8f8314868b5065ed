//! The evolving population and its double-buffered replacement area.
//!
//! One generation is: score into `fitnesses`, `rank`, `select_into_buffer`,
//! `swap_buffers`, then `advance_generation` to vary the new live buffer.
//! Selection writes only into the scratch buffer and variation touches only
//! the live one, so no chromosome is read and written in the same phase.

use crate::config::evolution::SelectionMethod;
use crate::config::traits::check_probability;
use crate::engines::generation::{
    genome::{Chromosome, GenomeSpec},
    operators,
};
use crate::error::{GepError, Result};
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-individual probabilities of each operator firing in a generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorRates {
    pub mutation: f64,
    pub crossover_one_point: f64,
    pub crossover_two_point: f64,
    pub is_transposition: f64,
    pub ris_transposition: f64,
}

impl OperatorRates {
    /// Rates for the classic operators; transposition disabled.
    pub fn new(crossover_one_point: f64, crossover_two_point: f64, mutation: f64) -> Self {
        Self {
            mutation,
            crossover_one_point,
            crossover_two_point,
            is_transposition: 0.0,
            ris_transposition: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("Mutation rate", self.mutation)?;
        check_probability("One-point crossover rate", self.crossover_one_point)?;
        check_probability("Two-point crossover rate", self.crossover_two_point)?;
        check_probability("IS transposition rate", self.is_transposition)?;
        check_probability("RIS transposition rate", self.ris_transposition)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Recombination {
    OnePoint,
    TwoPoint,
}

#[derive(Debug, Clone)]
pub struct Population {
    genome: Arc<GenomeSpec>,
    rates: OperatorRates,
    individuals: Vec<Chromosome>,
    selection_buffer: Vec<Chromosome>,
    fitnesses: Vec<f64>,
    max_fitness: f64,
    protected_slots: usize,
}

impl Population {
    /// Random initial population: head symbols uniform over the whole
    /// alphabet, tail symbols uniform over the terminals.
    pub fn new<R: Rng>(
        genome: Arc<GenomeSpec>,
        size: usize,
        rates: OperatorRates,
        max_fitness: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(GepError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        let individuals = (0..size).map(|_| genome.random_chromosome(rng)).collect();
        Self::from_individuals(genome, individuals, rates, max_fitness)
    }

    /// Population from existing chromosomes, each checked against `genome`.
    pub fn from_individuals(
        genome: Arc<GenomeSpec>,
        individuals: Vec<Chromosome>,
        rates: OperatorRates,
        max_fitness: f64,
    ) -> Result<Self> {
        rates.validate()?;
        if individuals.is_empty() {
            return Err(GepError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if let Some(bad) = individuals.iter().position(|c| !genome.is_valid(c)) {
            return Err(GepError::Configuration(format!(
                "Individual {} ({}) does not fit the genome",
                bad, individuals[bad]
            )));
        }

        let selection_buffer = individuals.clone();
        let fitnesses = vec![f64::NEG_INFINITY; individuals.len()];

        Ok(Self {
            genome,
            rates,
            individuals,
            selection_buffer,
            fitnesses,
            max_fitness,
            protected_slots: 0,
        })
    }

    /// Exclude the first `slots` individuals from variation.
    pub fn with_protected_slots(mut self, slots: usize) -> Self {
        self.protected_slots = slots.min(self.individuals.len());
        self
    }

    pub fn genome(&self) -> &GenomeSpec {
        &self.genome
    }

    pub fn rates(&self) -> &OperatorRates {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individual(&self, index: usize) -> &Chromosome {
        &self.individuals[index]
    }

    pub fn individuals(&self) -> &[Chromosome] {
        &self.individuals
    }

    pub fn fitness(&self, index: usize) -> f64 {
        self.fitnesses[index]
    }

    pub fn fitnesses(&self) -> &[f64] {
        &self.fitnesses
    }

    pub fn set_fitness(&mut self, index: usize, fitness: f64) {
        self.fitnesses[index] = fitness;
    }

    pub fn max_fitness(&self) -> f64 {
        self.max_fitness
    }

    pub fn protected_slots(&self) -> usize {
        self.protected_slots
    }

    /// Indices ordered by fitness, best first. Ties keep index order.
    pub fn rank(&self) -> Vec<usize> {
        let mut ranking: Vec<usize> = (0..self.fitnesses.len()).collect();
        ranking.sort_by(|&a, &b| operators::cmp_fitness_desc(self.fitnesses[a], self.fitnesses[b]));
        ranking
    }

    /// Fill the scratch buffer: the best individual goes to slot 0, every
    /// other slot is a copy of a parent chosen by `method`.
    pub fn select_into_buffer<R: Rng>(
        &mut self,
        ranking: &[usize],
        method: &SelectionMethod,
        rng: &mut R,
    ) {
        debug_assert_eq!(ranking.len(), self.individuals.len());

        self.selection_buffer[0].copy_from(&self.individuals[ranking[0]]);
        for slot in 1..self.selection_buffer.len() {
            let parent = operators::select_parent(method, ranking, &self.fitnesses, rng);
            self.selection_buffer[slot].copy_from(&self.individuals[parent]);
        }
    }

    /// Make the scratch buffer live. Fitnesses are stale afterwards.
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.individuals, &mut self.selection_buffer);
        self.fitnesses.fill(f64::NEG_INFINITY);
    }

    /// Vary the live buffer in place: mutation, IS and RIS transposition,
    /// then one-point and two-point recombination.
    pub fn advance_generation<R: Rng>(&mut self, rng: &mut R) {
        let first = self.protected_slots;

        for index in first..self.individuals.len() {
            if rng.gen::<f64>() < self.rates.mutation {
                let position = operators::mutate(&mut self.individuals[index], &self.genome, rng);
                trace!("Mutated individual {} at position {}", index, position);
            }
        }

        if self.rates.is_transposition > 0.0 {
            for index in first..self.individuals.len() {
                if rng.gen::<f64>() < self.rates.is_transposition {
                    operators::is_transpose(&mut self.individuals[index], &self.genome, rng);
                }
            }
        }

        if self.rates.ris_transposition > 0.0 {
            for index in first..self.individuals.len() {
                if rng.gen::<f64>() < self.rates.ris_transposition {
                    operators::ris_transpose(&mut self.individuals[index], &self.genome, rng);
                }
            }
        }

        self.recombine(Recombination::OnePoint, self.rates.crossover_one_point, rng);
        self.recombine(Recombination::TwoPoint, self.rates.crossover_two_point, rng);
    }

    /// Pair up unprotected individuals at random, without reuse, and
    /// recombine each pair with probability `probability`.
    fn recombine<R: Rng>(&mut self, kind: Recombination, probability: f64, rng: &mut R) {
        if probability <= 0.0 {
            return;
        }

        let length = self.genome.individual_length();
        let mut unpaired: Vec<usize> = (self.protected_slots..self.individuals.len()).collect();

        while unpaired.len() >= 2 {
            let a = unpaired.swap_remove(rng.gen_range(0..unpaired.len()));
            let b = unpaired.swap_remove(rng.gen_range(0..unpaired.len()));

            if rng.gen::<f64>() >= probability {
                continue;
            }

            let (first, second) = operators::pair_mut(&mut self.individuals, a, b);
            match kind {
                Recombination::OnePoint => {
                    let cut = rng.gen_range(0..length);
                    operators::one_point_crossover(first, second, cut);
                    trace!("One-point crossover {} x {} at {}", a, b, cut);
                }
                Recombination::TwoPoint => {
                    let p = rng.gen_range(0..length);
                    let q = rng.gen_range(0..length);
                    let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
                    operators::two_point_crossover(first, second, lo, hi);
                    trace!("Two-point crossover {} x {} over {}..{}", a, b, lo, hi);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genome() -> Arc<GenomeSpec> {
        Arc::new(GenomeSpec::from_chars("ab", "+-*/", 5, 2).unwrap())
    }

    #[test]
    fn test_new_population_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let population =
            Population::new(genome(), 30, OperatorRates::new(0.3, 0.1, 0.1), 0.0, &mut rng).unwrap();
        assert_eq!(population.len(), 30);
        assert_eq!(population.fitnesses().len(), 30);
        assert!(population
            .individuals()
            .iter()
            .all(|c| c.len() == 11 && population.genome().is_valid(c)));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let mut rng = StdRng::seed_from_u64(1);
        let rates = OperatorRates::new(0.3, 0.1, 0.1);
        assert!(Population::new(genome(), 0, rates, 0.0, &mut rng).is_err());
        assert!(Population::new(genome(), 5, OperatorRates::new(1.2, 0.0, 0.1), 0.0, &mut rng).is_err());
        assert!(Population::new(genome(), 5, OperatorRates::new(0.2, -0.1, 0.1), 0.0, &mut rng).is_err());

        let bad = vec![Chromosome::from("+++++++++++")];
        assert!(Population::from_individuals(genome(), bad, rates, 0.0).is_err());
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut population =
            Population::new(genome(), 5, OperatorRates::new(0.0, 0.0, 0.0), 0.0, &mut rng).unwrap();
        for (i, f) in [-3.0, 0.0, -3.0, f64::NAN, 0.0].into_iter().enumerate() {
            population.set_fitness(i, f);
        }
        assert_eq!(population.rank(), vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn test_selection_and_swap() {
        let individuals = vec![
            Chromosome::from("aaaaaaaaaaa"),
            Chromosome::from("+aaaaaaaaaa"),
            Chromosome::from("-aaaaaaaaaa"),
            Chromosome::from("*aaaaaaaaaa"),
        ];
        let mut population = Population::from_individuals(
            genome(),
            individuals,
            OperatorRates::new(0.0, 0.0, 0.0),
            0.0,
        )
        .unwrap();
        for (i, f) in [-1.0, -4.0, 0.0, -2.0].into_iter().enumerate() {
            population.set_fitness(i, f);
        }

        let ranking = population.rank();
        let mut rng = StdRng::seed_from_u64(4);
        population.select_into_buffer(&ranking, &SelectionMethod::Truncation { cutoff: 0.5 }, &mut rng);
        population.swap_buffers();

        assert_eq!(population.individual(0).to_string(), "-aaaaaaaaaa");
        for chromosome in population.individuals() {
            let s = chromosome.to_string();
            assert!(s == "-aaaaaaaaaa" || s == "aaaaaaaaaaa", "unexpected {}", s);
        }
        assert!(population.fitnesses().iter().all(|f| *f == f64::NEG_INFINITY));
    }

    #[test]
    fn test_roulette_selection_keeps_elite() {
        let individuals = vec![
            Chromosome::from("aaaaaaaaaaa"),
            Chromosome::from("+aaaaaaaaaa"),
            Chromosome::from("-aaaaaaaaaa"),
            Chromosome::from("*aaaaaaaaaa"),
        ];
        let mut population = Population::from_individuals(
            genome(),
            individuals,
            OperatorRates::new(0.0, 0.0, 0.0),
            0.0,
        )
        .unwrap();
        // the worst individual sits on the floor and gets no weight
        for (i, f) in [-9.0, -4.0, -1.0, -2.0].into_iter().enumerate() {
            population.set_fitness(i, f);
        }

        let ranking = population.rank();
        let mut rng = StdRng::seed_from_u64(8);
        population.select_into_buffer(&ranking, &SelectionMethod::Roulette, &mut rng);
        population.swap_buffers();

        assert_eq!(population.individual(0).to_string(), "-aaaaaaaaaa");
        assert!(population
            .individuals()
            .iter()
            .all(|c| c.to_string() != "aaaaaaaaaaa"));
    }

    #[test]
    fn test_advance_generation_keeps_tail_closed() {
        let mut rng = StdRng::seed_from_u64(5);
        let rates = OperatorRates {
            mutation: 0.9,
            crossover_one_point: 0.7,
            crossover_two_point: 0.7,
            is_transposition: 0.5,
            ris_transposition: 0.5,
        };
        let mut population = Population::new(genome(), 40, rates, 0.0, &mut rng).unwrap();

        for _ in 0..100 {
            population.advance_generation(&mut rng);
            assert!(population
                .individuals()
                .iter()
                .all(|c| population.genome().is_valid(c)));
        }
    }

    #[test]
    fn test_protected_slot_is_untouched() {
        let mut rng = StdRng::seed_from_u64(6);
        let rates = OperatorRates {
            mutation: 1.0,
            crossover_one_point: 1.0,
            crossover_two_point: 1.0,
            is_transposition: 1.0,
            ris_transposition: 1.0,
        };
        let mut population = Population::new(genome(), 10, rates, 0.0, &mut rng)
            .unwrap()
            .with_protected_slots(1);
        let elite = population.individual(0).clone();

        for _ in 0..50 {
            population.advance_generation(&mut rng);
        }
        assert_eq!(population.individual(0), &elite);
    }

    #[test]
    fn test_zero_rates_change_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut population =
            Population::new(genome(), 10, OperatorRates::new(0.0, 0.0, 0.0), 0.0, &mut rng).unwrap();
        let before = population.individuals().to_vec();
        population.advance_generation(&mut rng);
        assert_eq!(population.individuals(), &before[..]);
    }
}
