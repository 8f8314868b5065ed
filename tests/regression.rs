use genexpr::config::{AppConfig, EvolutionConfig, FitnessKind, SelectionMethod};
use genexpr::engines::evaluation::{SquaredErrorFitness, TrainingSet, PENALTY};
use genexpr::engines::generation::{
    ChannelProgressCallback, EvolutionEngine, GenomeSpec, KarvaDecoder, ProgressMessage,
};
use std::sync::mpsc;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn identity_training() -> TrainingSet {
    TrainingSet::new(&[-1.0, 0.0, 1.0], &[-1.0, 0.0, 1.0]).unwrap()
}

fn identity_config(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 50,
        max_generations: 500,
        mutation_rate: 0.1,
        crossover_one_point_rate: 0.3,
        seed: Some(seed),
        ..EvolutionConfig::default()
    }
}

#[test]
fn test_identity_regression_converges() {
    init_logging();

    let genome = Arc::new(GenomeSpec::from_chars("a", "+-*/", 5, 2).unwrap());
    assert_eq!(genome.individual_length(), 11);

    for seed in 0..5 {
        let fitness = SquaredErrorFitness::new(identity_training(), 0.0, 1.0);
        let mut engine =
            EvolutionEngine::new(Arc::clone(&genome), identity_config(seed), fitness).unwrap();

        let (sender, receiver) = mpsc::channel();
        let summary = engine.run(ChannelProgressCallback::new(sender)).unwrap();

        assert!(summary.converged, "seed {} did not converge", seed);
        assert_eq!(summary.best_fitness, 0.0);
        assert!(summary.generations < 500);

        // the winning chromosome really is an exact fit
        let decoder = KarvaDecoder::new(Arc::clone(&genome));
        let tree = decoder.decode(summary.best_chromosome.symbols()).unwrap();
        for x in [-1.0, 0.0, 1.0] {
            assert_eq!(tree.evaluate(x), x);
        }

        let bests = best_fitness_history(&receiver);
        assert_eq!(bests.len(), summary.generations);
    }
}

fn best_fitness_history(receiver: &mpsc::Receiver<ProgressMessage>) -> Vec<f64> {
    receiver
        .try_iter()
        .filter_map(|message| match message {
            ProgressMessage::GenerationComplete { best_fitness, .. } => Some(best_fitness),
            ProgressMessage::GenerationStart(_) => None,
        })
        .collect()
}

#[test]
fn test_elite_never_regresses_over_a_long_run() {
    init_logging();

    // x * sin(x) sampled at a few points; no +-*/ expression hits it exactly,
    // so every run goes to the generation ceiling
    let inputs = [-2.0, -1.0, -0.5, 0.5, 1.0, 2.0];
    let outputs: Vec<f64> = inputs.iter().map(|&x: &f64| x * x.sin()).collect();
    let genome = Arc::new(GenomeSpec::from_chars("a", "+-*/", 6, 2).unwrap());

    for selection_method in [
        SelectionMethod::default(),
        SelectionMethod::Tournament { size: 3 },
        SelectionMethod::Roulette,
    ] {
        let training = TrainingSet::new(&inputs, &outputs).unwrap();
        let config = EvolutionConfig {
            population_size: 40,
            max_generations: 60,
            mutation_rate: 0.3,
            crossover_one_point_rate: 0.4,
            selection_method,
            seed: Some(3),
            ..EvolutionConfig::default()
        };
        let fitness = SquaredErrorFitness::new(training, 0.0, 1.0);
        let mut engine = EvolutionEngine::new(Arc::clone(&genome), config, fitness).unwrap();

        let (sender, receiver) = mpsc::channel();
        let summary = engine.run(ChannelProgressCallback::new(sender)).unwrap();
        assert!(!summary.converged);
        assert_eq!(summary.generations, 60);

        let bests = best_fitness_history(&receiver);
        assert_eq!(bests.len(), 60);
        assert!(
            bests.windows(2).all(|w| w[1] >= w[0]),
            "{:?} regressed: {:?}",
            selection_method,
            bests
        );
        assert_eq!(bests[59], summary.best_fitness);
    }
}

#[test]
fn test_tail_closure_holds_across_generations() {
    init_logging();

    let genome = Arc::new(GenomeSpec::from_chars("ab", "+-*/^", 8, 2).unwrap());
    let training = TrainingSet::new(&[0.5, 1.5, 2.5], &[1.0, 2.0, 3.0]).unwrap();
    let config = EvolutionConfig {
        population_size: 30,
        max_generations: 100,
        mutation_rate: 0.8,
        crossover_one_point_rate: 0.6,
        crossover_two_point_rate: 0.6,
        is_transposition_rate: 0.4,
        ris_transposition_rate: 0.4,
        preserve_elite: false,
        seed: Some(17),
        ..EvolutionConfig::default()
    };
    let fitness = SquaredErrorFitness::new(training, 0.0, 1.0);
    let mut engine = EvolutionEngine::new(Arc::clone(&genome), config, fitness).unwrap();

    for _ in 0..100 {
        engine.step().unwrap();
        for chromosome in engine.population().individuals() {
            assert!(genome.is_valid(chromosome), "tail broken in {}", chromosome);
        }
    }
}

#[test]
fn test_tournament_selection_run() {
    init_logging();

    let genome = Arc::new(GenomeSpec::from_chars("a", "+-*/", 5, 2).unwrap());
    let config = EvolutionConfig {
        selection_method: SelectionMethod::Tournament { size: 3 },
        ..identity_config(21)
    };
    let fitness = SquaredErrorFitness::new(identity_training(), 0.0, 1.0);
    let mut engine = EvolutionEngine::new(genome, config, fitness).unwrap();

    let mut previous = f64::NEG_INFINITY;
    for _ in 0..20 {
        let stats = engine.step().unwrap();
        assert!(stats.best_fitness >= previous);
        previous = stats.best_fitness;
    }
}

#[test]
fn test_engine_from_app_config() {
    init_logging();

    let mut config = AppConfig::default();
    config.genome.head_length = 6;
    config.evolution.population_size = 25;
    config.evolution.max_generations = 15;
    config.evolution.hall_of_fame_size = 3;
    config.evolution.seed = Some(5);
    config.fitness.kind = FitnessKind::AbsoluteError;
    config.fitness.max_fitness = 10.0;

    // x * x is reachable but the run is too short to guarantee it
    let training = TrainingSet::new(&[-2.0, -1.0, 1.0, 3.0], &[4.0, 1.0, 1.0, 9.0]).unwrap();
    let mut engine = EvolutionEngine::from_config(&config, training).unwrap();
    let summary = engine
        .run(genexpr::engines::generation::ConsoleProgressCallback::default())
        .unwrap();

    assert!(summary.generations >= 1 && summary.generations <= 15);
    assert!(summary.best_fitness <= 40.0);
    assert!(!summary.hall_of_fame.is_empty() && summary.hall_of_fame.len() <= 3);
    assert_eq!(summary.hall_of_fame[0].fitness, summary.best_fitness);
    assert_eq!(engine.population().individual(0).len(), 13);
}

#[test]
fn test_division_by_zero_scores_but_does_not_fail() {
    let genome = Arc::new(GenomeSpec::from_chars("a", "/", 1, 2).unwrap());
    let decoder = KarvaDecoder::new(genome);
    let tree = decoder.decode(b"/aa").unwrap();
    assert_eq!(tree.to_string(), "(a / a)");
    assert_eq!(tree.evaluate(0.0), PENALTY);
    assert_eq!(tree.evaluate(2.0), 1.0);
}
