//! Genetic operators on chromosomes plus the selection picks.
//!
//! Every operator keeps the tail terminal-only: mutation draws tail symbols
//! from the terminals, recombination exchanges aligned positions between two
//! valid parents, and transposition only rewrites the head.

use crate::config::evolution::SelectionMethod;
use crate::engines::generation::genome::{Chromosome, GenomeSpec, Symbol};
use rand::Rng;
use std::cmp::Ordering;

/// Compare fitness values descending, NaN last.
pub fn cmp_fitness_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Truncation selection: uniform pick among the best `cutoff` fraction.
pub fn truncation_selection<R: Rng>(ranking: &[usize], cutoff: f64, rng: &mut R) -> usize {
    let pool = ((ranking.len() as f64 * cutoff) as usize).clamp(1, ranking.len());
    ranking[rng.gen_range(0..pool)]
}

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<R: Rng>(
    fitnesses: &[f64],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best_idx = rng.gen_range(0..fitnesses.len());

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..fitnesses.len());
        if cmp_fitness_desc(fitnesses[idx], fitnesses[best_idx]) == Ordering::Less {
            best_idx = idx;
        }
    }

    best_idx
}

/// Roulette wheel selection: probability proportional to fitness.
///
/// Fitness is shifted by the worst finite value first so that negative
/// scores still weigh in; NaN and infinite scores get no weight. When no
/// individual carries weight the pick is uniform.
pub fn roulette_selection<R: Rng>(fitnesses: &[f64], rng: &mut R) -> usize {
    let floor = fitnesses
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::INFINITY, f64::min);
    let weight = |f: f64| if f.is_finite() { (f - floor).max(0.0) } else { 0.0 };

    let total: f64 = fitnesses.iter().map(|&f| weight(f)).sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.gen_range(0..fitnesses.len());
    }

    let mut spin = rng.gen::<f64>() * total;
    for (index, &fitness) in fitnesses.iter().enumerate() {
        let w = weight(fitness);
        spin -= w;
        if w > 0.0 && spin <= 0.0 {
            return index;
        }
    }

    // rounding left a sliver of the wheel uncovered
    fitnesses
        .iter()
        .rposition(|&f| weight(f) > 0.0)
        .unwrap_or(fitnesses.len() - 1)
}

/// Index of the parent that fills one non-elite slot.
pub fn select_parent<R: Rng>(
    method: &SelectionMethod,
    ranking: &[usize],
    fitnesses: &[f64],
    rng: &mut R,
) -> usize {
    match *method {
        SelectionMethod::Truncation { cutoff } => truncation_selection(ranking, cutoff, rng),
        SelectionMethod::Tournament { size } => tournament_selection(fitnesses, size, rng),
        SelectionMethod::Roulette => roulette_selection(fitnesses, rng),
    }
}

/// Point mutation: redraw one position. Returns the position.
pub fn mutate<R: Rng>(chromosome: &mut Chromosome, genome: &GenomeSpec, rng: &mut R) -> usize {
    let position = rng.gen_range(0..chromosome.len());
    chromosome.symbols_mut()[position] = genome.random_symbol_at(position, rng);
    position
}

/// Exchange `[cut, len)` between two chromosomes in place.
pub fn one_point_crossover(a: &mut Chromosome, b: &mut Chromosome, cut: usize) {
    a.symbols_mut()[cut..].swap_with_slice(&mut b.symbols_mut()[cut..]);
}

/// Exchange `[lo, hi)` between two chromosomes in place.
pub fn two_point_crossover(a: &mut Chromosome, b: &mut Chromosome, lo: usize, hi: usize) {
    a.symbols_mut()[lo..hi].swap_with_slice(&mut b.symbols_mut()[lo..hi]);
}

/// Insertion-sequence transposition.
///
/// Copies a sequence of `1..head_length` symbols from anywhere in the
/// chromosome into the head at a position other than the root. Returns
/// false when the head is too short to hold a non-root insertion.
pub fn is_transpose<R: Rng>(chromosome: &mut Chromosome, genome: &GenomeSpec, rng: &mut R) -> bool {
    let head = genome.head_length();
    if head < 2 {
        return false;
    }

    let length = rng.gen_range(1..head);
    let start = rng.gen_range(0..=chromosome.len() - length);
    let target = rng.gen_range(1..head);

    let element: Vec<Symbol> = chromosome.symbols()[start..start + length].to_vec();
    insert_into_head(chromosome.symbols_mut(), head, target, &element);
    true
}

/// Root insertion-sequence transposition.
///
/// Scans the head from a random position for a function; the sequence
/// starting there becomes the new root. Returns false if no function is found.
pub fn ris_transpose<R: Rng>(chromosome: &mut Chromosome, genome: &GenomeSpec, rng: &mut R) -> bool {
    let head = genome.head_length();
    let start = rng.gen_range(0..head);

    let Some(offset) = chromosome.symbols()[start..head]
        .iter()
        .position(|&s| genome.is_function(s))
    else {
        return false;
    };

    let from = start + offset;
    let length = rng.gen_range(1..=head - from);
    let element: Vec<Symbol> = chromosome.symbols()[from..from + length].to_vec();
    insert_into_head(chromosome.symbols_mut(), head, 0, &element);
    true
}

/// Insert `element` at `target`, shifting the head right. Symbols pushed
/// past `head` are dropped; the tail is never touched.
fn insert_into_head(symbols: &mut [Symbol], head: usize, target: usize, element: &[Symbol]) {
    let region = &mut symbols[target..head];
    let n = element.len().min(region.len());
    region.rotate_right(n);
    region[..n].copy_from_slice(&element[..n]);
}

/// Two distinct mutable elements of one slice.
pub fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut needs distinct indices");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
