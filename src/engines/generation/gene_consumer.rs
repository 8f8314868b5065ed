use crate::engines::generation::genome::Symbol;

/// Reads chromosome symbols strictly left to right.
///
/// Unlike a wrapping reader, running off the end is reported to the caller:
/// a decoder that needs more symbols than the chromosome holds has found an
/// encoding bug.
pub struct GeneConsumer<'a> {
    symbols: &'a [Symbol],
    position: usize,
}

impl<'a> GeneConsumer<'a> {
    pub fn new(symbols: &'a [Symbol]) -> Self {
        Self {
            symbols,
            position: 0,
        }
    }

    /// Consume the next symbol, returning it with its position.
    pub fn consume(&mut self) -> Option<(usize, Symbol)> {
        let symbol = *self.symbols.get(self.position)?;
        let position = self.position;
        self.position += 1;
        Some((position, symbol))
    }

    /// Number of symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }
}
