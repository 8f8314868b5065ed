//! Genome representation for gene expression programming
//!
//! A chromosome is a fixed-length string of symbols split into two regions:
//! - **Head** (`head_length` symbols): terminals or functions
//! - **Tail** (the rest): terminals only
//!
//! The tail is exactly long enough to supply leaves for the worst case head
//! (every head symbol a function of `max_arity`), so any chromosome that keeps
//! the tail closed decodes to a complete expression tree. This is why
//! `individual_length = head_length * max_arity + 1`.
//!
//! # Why a linear genome?
//!
//! - **Crossover**: swapping suffixes or segments is plain slice work
//! - **Mutation**: replacing one symbol never produces an invalid tree
//!   as long as the tail stays terminal-only
//!
//! # Example
//!
//! ```
//! use genexpr::engines::generation::GenomeSpec;
//!
//! let spec = GenomeSpec::from_chars("a", "+-*/", 5, 2).unwrap();
//! assert_eq!(spec.individual_length(), 11);
//! ```

use crate::error::{GepError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One chromosome position. Symbols are single ASCII characters.
pub type Symbol = u8;

/// Binary operators a function symbol may stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    /// Protected: a zero divisor yields the penalty value.
    Div,
    /// Protected: a negative exponent yields the penalty value.
    Pow,
}

impl Operator {
    pub fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            b'+' => Some(Self::Add),
            b'-' => Some(Self::Sub),
            b'*' => Some(Self::Mul),
            b'/' => Some(Self::Div),
            b'^' => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> Symbol {
        match self {
            Self::Add => b'+',
            Self::Sub => b'-',
            Self::Mul => b'*',
            Self::Div => b'/',
            Self::Pow => b'^',
        }
    }

    pub fn arity(self) -> usize {
        2
    }
}

/// What a symbol means under a given `GenomeSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    Function(Operator),
}

/// Immutable description of the alphabet and chromosome geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeSpec {
    terminals: Vec<Symbol>,
    functions: Vec<Symbol>,
    head_length: usize,
    max_arity: usize,
    individual_length: usize,
}

impl GenomeSpec {
    pub fn new(
        terminals: &[Symbol],
        functions: &[Symbol],
        head_length: usize,
        max_arity: usize,
    ) -> Result<Self> {
        if terminals.is_empty() {
            return Err(GepError::Configuration(
                "At least one terminal symbol is required".to_string(),
            ));
        }
        if functions.is_empty() {
            return Err(GepError::Configuration(
                "At least one function symbol is required".to_string(),
            ));
        }
        if head_length == 0 {
            return Err(GepError::Configuration(
                "Head length must be positive".to_string(),
            ));
        }
        if max_arity == 0 {
            return Err(GepError::Configuration(
                "Max arity must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for &symbol in terminals.iter().chain(functions) {
            if !symbol.is_ascii_graphic() {
                return Err(GepError::Configuration(format!(
                    "Symbol {:#04x} is not a printable ASCII character",
                    symbol
                )));
            }
            if !seen.insert(symbol) {
                return Err(GepError::Configuration(format!(
                    "Symbol '{}' appears more than once in the alphabet",
                    symbol as char
                )));
            }
        }

        for &symbol in terminals {
            if Operator::from_symbol(symbol).is_some() {
                return Err(GepError::Configuration(format!(
                    "Operator '{}' cannot be used as a terminal",
                    symbol as char
                )));
            }
        }

        for &symbol in functions {
            let op = Operator::from_symbol(symbol).ok_or_else(|| {
                GepError::Configuration(format!(
                    "Function '{}' has no evaluator",
                    symbol as char
                ))
            })?;
            if op.arity() > max_arity {
                return Err(GepError::Configuration(format!(
                    "Function '{}' has arity {} but max arity is {}",
                    symbol as char,
                    op.arity(),
                    max_arity
                )));
            }
        }

        let individual_length = head_length
            .checked_mul(max_arity)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                GepError::Configuration("Chromosome length overflows usize".to_string())
            })?;

        Ok(Self {
            terminals: terminals.to_vec(),
            functions: functions.to_vec(),
            head_length,
            max_arity,
            individual_length,
        })
    }

    /// Build from character alphabets, e.g. `("a", "+-*/")`.
    pub fn from_chars(
        terminals: &str,
        functions: &str,
        head_length: usize,
        max_arity: usize,
    ) -> Result<Self> {
        let to_symbols = |s: &str| -> Result<Vec<Symbol>> {
            s.chars()
                .map(|c| {
                    u8::try_from(c).map_err(|_| {
                        GepError::Configuration(format!("Symbol '{}' is not ASCII", c))
                    })
                })
                .collect()
        };
        Self::new(
            &to_symbols(terminals)?,
            &to_symbols(functions)?,
            head_length,
            max_arity,
        )
    }

    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn functions(&self) -> &[Symbol] {
        &self.functions
    }

    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn head_length(&self) -> usize {
        self.head_length
    }

    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    pub fn individual_length(&self) -> usize {
        self.individual_length
    }

    pub fn tail_length(&self) -> usize {
        self.individual_length - self.head_length
    }

    pub fn classify(&self, symbol: Symbol) -> Option<SymbolKind> {
        if self.terminals.contains(&symbol) {
            Some(SymbolKind::Terminal)
        } else if self.functions.contains(&symbol) {
            Operator::from_symbol(symbol).map(SymbolKind::Function)
        } else {
            None
        }
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        self.terminals.contains(&symbol)
    }

    pub fn is_function(&self, symbol: Symbol) -> bool {
        self.functions.contains(&symbol)
    }

    /// Uniform over terminals ∪ functions.
    pub fn random_head_symbol<R: Rng>(&self, rng: &mut R) -> Symbol {
        let n = rng.gen_range(0..self.terminals.len() + self.functions.len());
        if n < self.terminals.len() {
            self.terminals[n]
        } else {
            self.functions[n - self.terminals.len()]
        }
    }

    /// Uniform over terminals only.
    pub fn random_tail_symbol<R: Rng>(&self, rng: &mut R) -> Symbol {
        self.terminals[rng.gen_range(0..self.terminals.len())]
    }

    /// Draw a symbol that is legal at `position`.
    pub fn random_symbol_at<R: Rng>(&self, position: usize, rng: &mut R) -> Symbol {
        if position < self.head_length {
            self.random_head_symbol(rng)
        } else {
            self.random_tail_symbol(rng)
        }
    }

    pub fn random_chromosome<R: Rng>(&self, rng: &mut R) -> Chromosome {
        let symbols = (0..self.individual_length)
            .map(|position| self.random_symbol_at(position, rng))
            .collect();
        Chromosome(symbols)
    }

    /// Right length, known symbols, terminal-only tail.
    pub fn is_valid(&self, chromosome: &Chromosome) -> bool {
        chromosome.len() == self.individual_length
            && chromosome.symbols()[..self.head_length]
                .iter()
                .all(|&s| self.classify(s).is_some())
            && chromosome.symbols()[self.head_length..]
                .iter()
                .all(|&s| self.is_terminal(s))
    }
}

/// A fixed-length symbol string. Geometry is owned by the `GenomeSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chromosome(Vec<Symbol>);

impl Chromosome {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn symbols_mut(&mut self) -> &mut [Symbol] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite with `other` without reallocating. Lengths must match.
    pub fn copy_from(&mut self, other: &Chromosome) {
        self.0.copy_from_slice(&other.0);
    }
}

impl From<&str> for Chromosome {
    fn from(s: &str) -> Self {
        Self(s.bytes().collect())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in &self.0 {
            write!(f, "{}", symbol as char)?;
        }
        Ok(())
    }
}
