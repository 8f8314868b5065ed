pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod manager;
pub mod traits;

pub use evolution::{EvolutionConfig, SelectionMethod};
pub use fitness::{FitnessConfig, FitnessKind};
pub use genome::GenomeConfig;
pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
