use crate::config::evolution::EvolutionConfig;
use crate::config::manager::AppConfig;
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::fitness::{FitnessFunction, TrainingSet};
use crate::engines::generation::{
    decoder::KarvaDecoder,
    genome::{Chromosome, GenomeSpec},
    hall_of_fame::{EliteIndividual, HallOfFame},
    population::Population,
};
use crate::error::{GepError, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Summary of one completed generation, taken before variation.
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_chromosome: Chromosome,
    pub best_expression: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generations: usize,
    /// Best fitness reached the fitness function's perfect score.
    pub converged: bool,
    pub best_fitness: f64,
    pub best_chromosome: Chromosome,
    pub best_expression: String,
    pub hall_of_fame: Vec<EliteIndividual>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize);
}

pub struct EvolutionEngine<F: FitnessFunction> {
    config: EvolutionConfig,
    decoder: KarvaDecoder,
    population: Population,
    fitness: F,
    hall_of_fame: HallOfFame,
    rng: StdRng,
    generation: usize,
}

impl EvolutionEngine<Box<dyn FitnessFunction>> {
    /// Engine wired from a full application config.
    pub fn from_config(config: &AppConfig, training: TrainingSet) -> Result<Self> {
        config.validate()?;
        let genome = Arc::new(config.genome.build()?);
        let fitness = config.fitness.build(training);
        Self::new(genome, config.evolution.clone(), fitness)
    }
}

impl<F: FitnessFunction> EvolutionEngine<F> {
    pub fn new(genome: Arc<GenomeSpec>, config: EvolutionConfig, fitness: F) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let protected = usize::from(config.preserve_elite);
        let population = Population::new(
            Arc::clone(&genome),
            config.population_size,
            config.operator_rates(),
            fitness.perfect_score(),
            &mut rng,
        )?
        .with_protected_slots(protected);

        info!(
            "Population of {} created (chromosome length {}, head {})",
            population.len(),
            genome.individual_length(),
            genome.head_length()
        );

        Ok(Self {
            hall_of_fame: HallOfFame::new(config.hall_of_fame_size),
            decoder: KarvaDecoder::new(genome),
            config,
            population,
            fitness,
            rng,
            generation: 0,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn decoder(&self) -> &KarvaDecoder {
        &self.decoder
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Decode and score every live individual.
    ///
    /// A decode failure means the genome and operators disagree; it aborts
    /// the run rather than being scored.
    pub fn score(&mut self) -> Result<()> {
        for index in 0..self.population.len() {
            let tree = self
                .decoder
                .decode(self.population.individual(index).symbols())?;
            let fitness = self.fitness.evaluate(&tree);
            self.population.set_fitness(index, fitness);
        }
        Ok(())
    }

    /// One generation: score, rank, select, swap, vary.
    pub fn step(&mut self) -> Result<GenerationStats> {
        self.score()?;

        let ranking = self.population.rank();
        let best = ranking[0];
        let best_chromosome = self.population.individual(best).clone();
        let best_expression = self.decoder.decode(best_chromosome.symbols())?.to_string();
        let fitnesses = self.population.fitnesses();
        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: fitnesses[best],
            mean_fitness: fitnesses.iter().sum::<f64>() / fitnesses.len() as f64,
            best_chromosome,
            best_expression,
        };

        self.hall_of_fame.try_add(EliteIndividual {
            chromosome: stats.best_chromosome.clone(),
            fitness: stats.best_fitness,
            expression: stats.best_expression.clone(),
            generation: stats.generation,
        });

        self.population
            .select_into_buffer(&ranking, &self.config.selection_method, &mut self.rng);
        self.population.swap_buffers();
        self.population.advance_generation(&mut self.rng);
        self.generation += 1;

        debug!(
            "Generation {}: best {:.4}, mean {:.4}",
            stats.generation, stats.best_fitness, stats.mean_fitness
        );

        Ok(stats)
    }

    /// Run until the perfect score is reached or the generation ceiling is hit.
    ///
    /// Fails with `GenerationLimit` if the ceiling was already reached.
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<RunSummary> {
        let target = self.population.max_fitness();
        let mut best: Option<GenerationStats> = None;
        let mut converged = false;

        while self.generation < self.config.max_generations {
            callback.on_generation_start(self.generation);
            let stats = self.step()?;
            callback.on_generation_complete(&stats, self.hall_of_fame.len());

            let improved = best
                .as_ref()
                .map_or(true, |b| stats.best_fitness > b.best_fitness);
            converged = stats.best_fitness >= target;
            if improved {
                info!(
                    "Generation {}: best so far {:.6} {}",
                    stats.generation, stats.best_fitness, stats.best_expression
                );
                best = Some(stats);
            }
            if converged {
                break;
            }
        }

        let best = best.ok_or(GepError::GenerationLimit(self.config.max_generations))?;

        if converged {
            info!("Converged after {} generations", self.generation);
        } else {
            warn!(
                "Stopped at the generation ceiling ({}) with best fitness {:.6}",
                self.config.max_generations, best.best_fitness
            );
        }

        Ok(RunSummary {
            generations: self.generation,
            converged,
            best_fitness: best.best_fitness,
            best_chromosome: best.best_chromosome,
            best_expression: best.best_expression,
            hall_of_fame: self.hall_of_fame.get_all().to_vec(),
        })
    }
}
