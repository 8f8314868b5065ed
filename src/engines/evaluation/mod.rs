pub mod expression;
pub mod fitness;

pub use expression::{evaluate, evaluate_all, PENALTY};
pub use fitness::{
    AbsoluteErrorFitness, FitnessFunction, SquaredErrorFitness, TrainingCase, TrainingSet,
};
