use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty chromosome")]
    Empty,

    #[error("Chromosome exhausted after {consumed} symbols with {open_slots} open slots")]
    Exhausted { consumed: usize, open_slots: usize },

    #[error("Unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    #[error("Function node {node} is missing a child")]
    IncompleteNode { node: usize },
}

#[derive(Error, Debug)]
pub enum GepError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Generation limit of {0} already reached")]
    GenerationLimit(usize),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GepError>;
