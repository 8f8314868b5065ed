use crate::engines::generation::genome::Chromosome;
use crate::engines::generation::operators::cmp_fitness_desc;

use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct EliteIndividual {
    pub chromosome: Chromosome,
    pub fitness: f64,
    pub expression: String, // Rendered tree, used for deduplication
    pub generation: usize,
}

/// Best distinct expressions seen over a run.
///
/// Chromosomes that differ only in their non-coding region render to the
/// same expression and count as one entry.
pub struct HallOfFame {
    entries: Vec<EliteIndividual>,
    max_size: usize,
    seen_expressions: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_expressions: HashSet::new(),
        }
    }

    /// Attempt to add an individual. Returns false for duplicates and for
    /// individuals that fall straight off the end.
    pub fn try_add(&mut self, individual: EliteIndividual) -> bool {
        if self.max_size == 0 || self.seen_expressions.contains(&individual.expression) {
            return false;
        }

        let expression = individual.expression.clone();
        self.seen_expressions.insert(expression.clone());
        self.entries.push(individual);

        // Sort by fitness (descending); equal fitness keeps insertion order
        self.entries
            .sort_by(|a, b| cmp_fitness_desc(a.fitness, b.fitness));

        if self.entries.len() > self.max_size {
            if let Some(dropped) = self.entries.pop() {
                self.seen_expressions.remove(&dropped.expression);
                return dropped.expression != expression;
            }
        }
        true
    }

    pub fn best(&self) -> Option<&EliteIndividual> {
        self.entries.first()
    }

    pub fn get_all(&self) -> &[EliteIndividual] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elite(expression: &str, fitness: f64) -> EliteIndividual {
        EliteIndividual {
            chromosome: Chromosome::from("aaa"),
            fitness,
            expression: expression.to_string(),
            generation: 0,
        }
    }

    #[test]
    fn test_sorted_and_bounded() {
        let mut hall = HallOfFame::new(2);
        assert!(hall.try_add(elite("a", -5.0)));
        assert!(hall.try_add(elite("(a + a)", -1.0)));
        assert!(hall.try_add(elite("(a * a)", -3.0)));
        assert!(!hall.try_add(elite("(a - a)", -9.0)));

        let fitnesses: Vec<f64> = hall.get_all().iter().map(|e| e.fitness).collect();
        assert_eq!(fitnesses, vec![-1.0, -3.0]);
        assert_eq!(hall.best().map(|e| e.expression.as_str()), Some("(a + a)"));
    }

    #[test]
    fn test_rejects_duplicate_expressions() {
        let mut hall = HallOfFame::new(5);
        assert!(hall.try_add(elite("(a * a)", -3.0)));
        assert!(!hall.try_add(elite("(a * a)", -3.0)));
        assert_eq!(hall.len(), 1);
    }

    #[test]
    fn test_dropped_expression_can_return() {
        let mut hall = HallOfFame::new(1);
        assert!(hall.try_add(elite("a", -5.0)));
        assert!(hall.try_add(elite("(a + a)", -1.0)));
        assert_eq!(hall.len(), 1);
        // "a" was evicted: not a duplicate any more, but still too weak
        assert!(!hall.try_add(elite("a", -5.0)));
        assert!(hall.try_add(elite("a", 0.0)));
        assert_eq!(hall.best().map(|e| e.expression.as_str()), Some("a"));
    }
}
