//! Class-balanced selection of positive (OP delta) and negative comments.
//!
//! Both the negative draw and the final shuffle get their own generator built
//! from the same `CorpusSeed`, so either step reproduces on its own.

use crate::config::DEFAULT_SEED;
use crate::tree::{Comment, Post};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// There are fewer negative candidates than positives to balance against.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("insufficient data: {positives} OP-delta comments but only {candidates} negative candidates")]
pub struct InsufficientDataError {
    pub positives: usize,
    pub candidates: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorpusSeed(pub u64);

impl Default for CorpusSeed {
    fn default() -> Self {
        Self(DEFAULT_SEED)
    }
}

impl CorpusSeed {
    /// Fresh generator in its initial state.
    pub fn rng(self) -> StdRng {
        StdRng::seed_from_u64(self.0)
    }
}

/// Top-level comments of threads where OP awarded at least one delta, split by label.
#[derive(Clone, Debug, Default)]
pub struct Candidates<'a> {
    pub positives: Vec<&'a Comment>,
    pub negatives: Vec<&'a Comment>,
}

/// Split the forest into positives and negative candidates, preserving input order.
/// Threads without an OP delta (or not yet attributed) contribute nothing.
pub fn partition_candidates(posts: &[Post]) -> Candidates<'_> {
    let mut out = Candidates::default();
    for post in posts.iter().filter(|p| p.has_op_concession() == Some(true)) {
        for comment in post.comments() {
            if comment.is_op_concession() {
                out.positives.push(comment);
            } else {
                out.negatives.push(comment);
            }
        }
    }
    out
}

/// Draw `n` items without replacement, in the order the generator picks them.
pub fn sample_negatives<'a, R: Rng + ?Sized>(
    rng: &mut R,
    negatives: &[&'a Comment],
    n: usize,
) -> Result<Vec<&'a Comment>, InsufficientDataError> {
    if negatives.len() < n {
        return Err(InsufficientDataError { positives: n, candidates: negatives.len() });
    }
    Ok(index::sample(rng, negatives.len(), n).into_iter().map(|i| negatives[i]).collect())
}

pub fn shuffle_selection<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    items.shuffle(rng);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BalancedSampler {
    seed: CorpusSeed,
}

impl BalancedSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed: CorpusSeed(seed) }
    }

    pub fn seed(&self) -> CorpusSeed {
        self.seed
    }

    /// All positives plus an equal number of sampled negatives, shuffled.
    pub fn select<'a>(&self, posts: &'a [Post]) -> Result<Vec<&'a Comment>, InsufficientDataError> {
        let candidates = partition_candidates(posts);
        self.select_from(&candidates)
    }

    pub fn select_from<'a>(&self, candidates: &Candidates<'a>) -> Result<Vec<&'a Comment>, InsufficientDataError> {
        let n = candidates.positives.len();
        let negatives = sample_negatives(&mut self.seed.rng(), &candidates.negatives, n)?;

        let mut selected = Vec::with_capacity(n * 2);
        selected.extend(candidates.positives.iter().copied());
        selected.extend(negatives);
        shuffle_selection(&mut self.seed.rng(), &mut selected);
        Ok(selected)
    }
}
