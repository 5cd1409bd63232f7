//! Permutation operators: order crossover and three mutations.
//!
//! Every operator keeps the permutation invariant: each gene of the input
//! appears exactly once in the output.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Order crossover (OX) with random cut points.
///
/// Draws `a <= b` uniformly over the permutation length and delegates to
/// [`order_crossover_with_cuts`].
pub fn order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    if n < 2 {
        return parent1.to_vec();
    }
    let (mut a, mut b) = (rng.random_range(0..n), rng.random_range(0..n));
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    order_crossover_with_cuts(parent1, parent2, a, b)
}

/// Order crossover with explicit cut points `a <= b <= len`.
///
/// `parent1[a..b]` is copied in place. The remaining slots are filled
/// starting at `b` (wrapping) with the genes of `parent2`, read from
/// position `b` (wrapping), skipping genes already copied.
///
/// # Examples
///
/// ```
/// use delivery_ga::ga::order_crossover_with_cuts;
///
/// let child = order_crossover_with_cuts(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1], 1, 3);
/// // Slice [2, 3] from parent 1; then 1, 5, 4 from parent 2 starting at index 3.
/// assert_eq!(child, vec![4, 2, 3, 1, 5]);
/// ```
pub fn order_crossover_with_cuts(
    parent1: &[usize],
    parent2: &[usize],
    a: usize,
    b: usize,
) -> Vec<usize> {
    let n = parent1.len();
    if n == 0 {
        return Vec::new();
    }
    let b = b.min(n);
    let a = a.min(b);

    let max_gene = parent1.iter().chain(parent2).copied().max().unwrap_or(0);
    let mut taken = vec![false; max_gene + 1];
    let mut child: Vec<Option<usize>> = vec![None; n];

    for i in a..b {
        child[i] = Some(parent1[i]);
        taken[parent1[i]] = true;
    }

    let mut filled = b - a;
    let mut pos = b % n;
    for k in 0..n {
        if filled == n {
            break;
        }
        let gene = parent2[(b + k) % n];
        if taken[gene] {
            continue;
        }
        while child[pos].is_some() {
            pos = (pos + 1) % n;
        }
        child[pos] = Some(gene);
        taken[gene] = true;
        filled += 1;
    }

    child.into_iter().flatten().collect()
}

/// Swaps the genes at two random positions.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (i, j) = (rng.random_range(0..n), rng.random_range(0..n));
    perm.swap(i, j);
}

/// Reverses the genes between two random positions, both included.
pub fn reverse_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (i, j) = (rng.random_range(0..n), rng.random_range(0..n));
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    perm[lo..=hi].reverse();
}

/// Moves the gene at one random position to another, shifting the genes
/// in between.
pub fn relocate_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (from, to) = (rng.random_range(0..n), rng.random_range(0..n));
    relocate(perm, from, to);
}

/// Moves `perm[from]` to index `to`.
pub fn relocate(perm: &mut [usize], from: usize, to: usize) {
    if from < to {
        perm[from..=to].rotate_left(1);
    } else if to < from {
        perm[to..=from].rotate_right(1);
    }
}

/// A mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Swap,
    Reverse,
    Relocate,
}

impl Mutation {
    pub fn apply<R: Rng>(self, perm: &mut [usize], rng: &mut R) {
        match self {
            Mutation::Swap => swap_mutation(perm, rng),
            Mutation::Reverse => reverse_mutation(perm, rng),
            Mutation::Relocate => relocate_mutation(perm, rng),
        }
    }
}

/// Relative selection weights of the mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationWeights {
    pub swap: f64,
    pub reverse: f64,
    pub relocate: f64,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            swap: 1.0,
            reverse: 1.0,
            relocate: 1.0,
        }
    }
}

impl MutationWeights {
    pub fn new(swap: f64, reverse: f64, relocate: f64) -> Self {
        Self {
            swap,
            reverse,
            relocate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [self.swap, self.reverse, self.relocate];
        let total: f64 = weights.iter().sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || !total.is_finite() || total <= 0.0
        {
            return Err(RoutingError::MutationWeights);
        }
        Ok(())
    }

    /// Picks one operator with probability proportional to its weight.
    ///
    /// The weights must pass [`validate`](MutationWeights::validate).
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Mutation {
        let total = self.swap + self.reverse + self.relocate;
        let roll = rng.random_range(0.0..total);
        if roll < self.swap {
            Mutation::Swap
        } else if roll < self.swap + self.reverse {
            Mutation::Reverse
        } else {
            Mutation::Relocate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(v: &[usize]) -> Vec<usize> {
        let mut v = v.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_ox_keeps_slice_in_place() {
        let p1 = [1, 2, 3, 4, 5, 6, 7, 8];
        let p2 = [8, 6, 4, 2, 7, 5, 3, 1];
        let child = order_crossover_with_cuts(&p1, &p2, 2, 5);
        assert_eq!(&child[2..5], &[3, 4, 5]);
        // Fill reads p2 from index 5: 5(skip), 3(skip), 1, 8, 6, 4(skip), 2, 7
        // and writes from index 5: 1, 8, 6, then wraps: 2, 7
        assert_eq!(child, vec![2, 7, 3, 4, 5, 1, 8, 6]);
    }

    #[test]
    fn test_ox_empty_slice_copies_parent2() {
        let p1 = [1, 2, 3, 4];
        let p2 = [3, 1, 4, 2];
        assert_eq!(order_crossover_with_cuts(&p1, &p2, 2, 2), p2.to_vec());
    }

    #[test]
    fn test_ox_full_slice_copies_parent1() {
        let p1 = [1, 2, 3, 4];
        let p2 = [3, 1, 4, 2];
        assert_eq!(order_crossover_with_cuts(&p1, &p2, 0, 4), p1.to_vec());
    }

    #[test]
    fn test_ox_tiny() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(order_crossover(&[], &[], &mut rng).is_empty());
        assert_eq!(order_crossover(&[7], &[7], &mut rng), vec![7]);
    }

    #[test]
    fn test_relocate() {
        let mut v = vec![1, 2, 3, 4, 5];
        relocate(&mut v, 1, 3);
        assert_eq!(v, vec![1, 3, 4, 2, 5]);
        relocate(&mut v, 3, 0);
        assert_eq!(v, vec![2, 1, 3, 4, 5]);
        relocate(&mut v, 2, 2);
        assert_eq!(v, vec![2, 1, 3, 4, 5]);
    }

    #[test]
    fn test_mutations_on_tiny_permutations() {
        let mut rng = StdRng::seed_from_u64(3);
        for op in [Mutation::Swap, Mutation::Reverse, Mutation::Relocate] {
            let mut empty: Vec<usize> = vec![];
            op.apply(&mut empty, &mut rng);
            assert!(empty.is_empty());
            let mut one = vec![4];
            op.apply(&mut one, &mut rng);
            assert_eq!(one, vec![4]);
        }
    }

    #[test]
    fn test_weights_validate() {
        assert!(MutationWeights::default().validate().is_ok());
        assert!(MutationWeights::new(0.0, 0.0, 1.0).validate().is_ok());
        assert_eq!(
            MutationWeights::new(0.0, 0.0, 0.0).validate(),
            Err(RoutingError::MutationWeights)
        );
        assert!(MutationWeights::new(-1.0, 1.0, 1.0).validate().is_err());
        assert!(MutationWeights::new(f64::NAN, 1.0, 1.0).validate().is_err());
        // Each weight is finite but the total is not.
        assert_eq!(
            MutationWeights::new(f64::MAX, f64::MAX, 0.0).validate(),
            Err(RoutingError::MutationWeights)
        );
    }

    #[test]
    fn test_weights_choose_only_weighted() {
        let mut rng = StdRng::seed_from_u64(9);
        let only_reverse = MutationWeights::new(0.0, 2.0, 0.0);
        for _ in 0..100 {
            assert_eq!(only_reverse.choose(&mut rng), Mutation::Reverse);
        }
        let weights = MutationWeights::default();
        let picks: Vec<Mutation> = (0..300).map(|_| weights.choose(&mut rng)).collect();
        for op in [Mutation::Swap, Mutation::Reverse, Mutation::Relocate] {
            assert!(picks.contains(&op));
        }
    }

    fn arb_parents() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        (1usize..40).prop_flat_map(|n| {
            let genes: Vec<usize> = (1..=n).collect();
            (Just(genes.clone()).prop_shuffle(), Just(genes).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn prop_ox_is_permutation((p1, p2) in arb_parents(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let child = order_crossover(&p1, &p2, &mut rng);
            prop_assert_eq!(sorted(&child), sorted(&p1));
        }

        #[test]
        fn prop_ox_with_any_cuts((p1, p2) in arb_parents(), x in 0usize..50, y in 0usize..50) {
            let (a, b) = (x.min(y) % (p1.len() + 1), x.max(y) % (p1.len() + 1));
            let (a, b) = (a.min(b), a.max(b));
            let child = order_crossover_with_cuts(&p1, &p2, a, b);
            prop_assert_eq!(&child[a..b], &p1[a..b]);
            prop_assert_eq!(sorted(&child), sorted(&p1));
        }

        #[test]
        fn prop_mutations_are_permutations((p1, _) in arb_parents(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            for op in [Mutation::Swap, Mutation::Reverse, Mutation::Relocate] {
                let mut perm = p1.clone();
                op.apply(&mut perm, &mut rng);
                prop_assert_eq!(sorted(&perm), sorted(&p1));
            }
        }
    }
}
