use super::evolution_engine::{GenerationStats, ProgressCallback};
use log::{debug, info};

/// Logs a line whenever the best fitness improves, and every generation at
/// debug level.
#[derive(Debug, Default)]
pub struct ConsoleProgressCallback {
    best_so_far: Option<f64>,
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, hof_size: usize) {
        let improved = self.best_so_far.map_or(true, |best| stats.best_fitness > best);
        if improved {
            self.best_so_far = Some(stats.best_fitness);
            info!(
                "GENERATION {}: best individual so far ({:.6}): {}",
                stats.generation, stats.best_fitness, stats.best_chromosome
            );
        }
        debug!(
            "Generation {} complete. Best fitness: {:.4}, Hall of Fame size: {}",
            stats.generation + 1,
            stats.best_fitness,
            hof_size
        );
    }
}

/// Forwards progress over a channel, e.g. to a reporting thread.
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete {
        generation: usize,
        best_fitness: f64,
        best_expression: String,
        hof_size: usize,
    },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, hof_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation: stats.generation,
            best_fitness: stats.best_fitness,
            best_expression: stats.best_expression.clone(),
            hof_size,
        });
    }
}
