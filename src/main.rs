use anyhow::Context;
use env_logger::Env;
use genexpr::config::ConfigManager;
use genexpr::engines::evaluation::TrainingSet;
use genexpr::engines::generation::{ConsoleProgressCallback, EvolutionEngine};

const INPUTS: [f64; 41] = [
    -2.0, -1.9, -1.8, -1.7, -1.6, -1.5, -1.4, -1.3, -1.2, -1.1, -1.0, -0.9, -0.8, -0.7, -0.6,
    -0.5, -0.4, -0.3, -0.2, -0.1, 0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2,
    1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0,
];

const OUTPUTS: [f64; 41] = [
    0.110115, -0.378666, -0.0884169, 0.0496072, -0.317578, -0.756975, -0.853041, -0.581914,
    -0.15522, 0.222213, 0.454649, 0.540203, 0.520615, 0.443212, 0.344088, 0.245474, 0.158992,
    0.0898458, 0.0399881, 0.00999983, 0.0, 0.00999983, 0.0399881, 0.0898458, 0.158992, 0.245474,
    0.344088, 0.443212, 0.520615, 0.540203, 0.454649, 0.222213, -0.15522, -0.581914, -0.853041,
    -0.756975, -0.317578, 0.0496072, -0.0884169, -0.378666, 0.110115,
];

/// Progress is logged at `info`, so that is the default level.
fn logger(env: Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

/// Usage: `genexpr [SEED] [CONFIG.toml]`
fn main() -> anyhow::Result<()> {
    logger(Env::default()).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("seed must be a non-negative integer")?;

    let manager = ConfigManager::new();
    if let Some(path) = args.next() {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    if seed.is_some() {
        manager.update(|config| config.evolution.seed = seed)?;
    }
    let config = manager.get();

    let training = TrainingSet::new(&INPUTS, &OUTPUTS)?;
    let mut engine = EvolutionEngine::from_config(&config, training)?;
    let summary = engine.run(ConsoleProgressCallback::default())?;

    println!("best individual: ");
    println!("{}", summary.best_chromosome);
    println!("{}", summary.best_expression);
    println!(
        "fitness {:.6} after {} generations{}",
        summary.best_fitness,
        summary.generations,
        if summary.converged { " (converged)" } else { "" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_progress_is_logged_by_default() {
        let logger = logger(Env::new().filter("GENEXPR_UNSET_LOG_FILTER")).build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn test_driver_dataset_is_valid() {
        assert!(TrainingSet::new(&INPUTS, &OUTPUTS).is_ok());
    }
}
