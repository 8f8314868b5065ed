use super::traits::ConfigSection;
use crate::engines::generation::genome::GenomeSpec;
use crate::error::GepError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    /// One character per terminal symbol.
    pub terminals: String,
    /// One character per function symbol, drawn from `+ - * / ^`.
    pub functions: String,
    pub head_length: usize,
    pub max_arity: usize,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            terminals: "a".to_string(),
            functions: "*-+/".to_string(),
            head_length: 150,
            max_arity: 2,
        }
    }
}

impl GenomeConfig {
    pub fn build(&self) -> Result<GenomeSpec, GepError> {
        GenomeSpec::from_chars(
            &self.terminals,
            &self.functions,
            self.head_length,
            self.max_arity,
        )
    }
}

impl ConfigSection for GenomeConfig {
    fn section_name() -> &'static str {
        "genome"
    }

    fn validate(&self) -> Result<(), GepError> {
        self.build().map(|_| ())
    }
}
