pub mod ast;
pub mod decoder;
pub mod evolution_engine;
pub mod gene_consumer;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod population;
pub mod progress;

pub use ast::{ExprNode, ExpressionTree, NodeId};
pub use decoder::KarvaDecoder;
pub use evolution_engine::{EvolutionEngine, GenerationStats, ProgressCallback, RunSummary};
pub use genome::{Chromosome, GenomeSpec, Operator, Symbol, SymbolKind};
pub use hall_of_fame::{EliteIndividual, HallOfFame};
pub use population::{OperatorRates, Population};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
