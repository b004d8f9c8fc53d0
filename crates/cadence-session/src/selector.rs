//! Session content selection.
//!
//! Candidates are classified by proficiency (0-100, missing means never seen):
//!
//! * below 30 or missing: expansion (new material)
//! * 30 to 79: weakness (material to consolidate)
//! * 80 and above: success (material the learner already knows)
//!
//! Each bucket is sampled uniformly without replacement up to its share of the target
//! (30% success, 50% weakness, remainder expansion). When a bucket runs short the
//! session is topped up from whatever was left over, and the top-up lands in the
//! weakness bucket.

use std::collections::{HashMap, HashSet};

use cadence_store::ReviewItem;
use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

/// Learner proficiency per item, 0-100.
pub type ProficiencyMap = HashMap<Uuid, u8>;

const SUCCESS_SHARE: f64 = 0.3;
const WEAKNESS_SHARE: f64 = 0.5;

const EXPANSION_BELOW: u8 = 30;
const SUCCESS_FROM: u8 = 80;

/// Anything that can be put into a session.
pub trait Candidate {
    fn candidate_id(&self) -> Uuid;
}

impl Candidate for ReviewItem {
    fn candidate_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentBucket {
    Success,
    Weakness,
    Expansion,
}

impl ContentBucket {
    pub fn classify(proficiency: Option<u8>) -> Self {
        match proficiency.map(|p| p.min(100)) {
            None => Self::Expansion,
            Some(p) if p < EXPANSION_BELOW => Self::Expansion,
            Some(p) if p < SUCCESS_FROM => Self::Weakness,
            Some(_) => Self::Success,
        }
    }
}

/// How many items each bucket should contribute for a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTargets {
    pub success: usize,
    pub weakness: usize,
    pub expansion: usize,
}

impl BucketTargets {
    pub fn for_target(target_count: usize) -> Self {
        let success = share(target_count, SUCCESS_SHARE);
        let weakness = share(target_count, WEAKNESS_SHARE).min(target_count - success);
        Self {
            success,
            weakness,
            expansion: target_count - success - weakness,
        }
    }
}

fn share(target_count: usize, ratio: f64) -> usize {
    (target_count as f64 * ratio).round() as usize
}

/// Selected content, still grouped by bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContent<T> {
    pub success: Vec<T>,
    pub weakness: Vec<T>,
    pub expansion: Vec<T>,
}

impl<T> SessionContent<T> {
    pub fn len(&self) -> usize {
        self.success.len() + self.weakness.len() + self.expansion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten the buckets into one list in random order, so the on-screen order
    /// gives no hint of which bucket an item came from.
    pub fn into_shuffled<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<T> {
        let mut all = Vec::with_capacity(self.len());
        all.extend(self.success);
        all.extend(self.weakness);
        all.extend(self.expansion);
        all.shuffle(rng);
        all
    }
}

/// Pick up to `target_count` candidates following the 30/50/20 mix.
///
/// Never fails: an undersized pool yields every (distinct) candidate. Candidates that
/// share an id are only considered once.
pub fn select_content<T, R>(
    candidates: &[T],
    target_count: usize,
    proficiency: &ProficiencyMap,
    rng: &mut R,
) -> SessionContent<T>
where
    T: Candidate + Clone,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::with_capacity(candidates.len());
    let mut success_pool = Vec::new();
    let mut weakness_pool = Vec::new();
    let mut expansion_pool = Vec::new();

    for candidate in candidates {
        let id = candidate.candidate_id();
        if !seen.insert(id) {
            continue;
        }
        match ContentBucket::classify(proficiency.get(&id).copied()) {
            ContentBucket::Success => success_pool.push(candidate.clone()),
            ContentBucket::Weakness => weakness_pool.push(candidate.clone()),
            ContentBucket::Expansion => expansion_pool.push(candidate.clone()),
        }
    }

    let available = seen.len();
    let targets = BucketTargets::for_target(target_count);
    let mut leftovers = Vec::new();

    let success = sample(success_pool, targets.success, &mut leftovers, rng);
    let mut weakness = sample(weakness_pool, targets.weakness, &mut leftovers, rng);
    let expansion = sample(expansion_pool, targets.expansion, &mut leftovers, rng);

    let selected = success.len() + weakness.len() + expansion.len();
    let shortfall = target_count.min(available).saturating_sub(selected);
    if shortfall > 0 {
        tracing::debug!(
            "Topping up session content with {} leftover candidates",
            shortfall
        );
        leftovers.shuffle(rng);
        weakness.extend(leftovers.into_iter().take(shortfall));
    }

    SessionContent {
        success,
        weakness,
        expansion,
    }
}

/// Shuffle the pool, keep `count` items and push the rest into `leftovers`.
fn sample<T, R: Rng + ?Sized>(
    mut pool: Vec<T>,
    count: usize,
    leftovers: &mut Vec<T>,
    rng: &mut R,
) -> Vec<T> {
    pool.shuffle(rng);
    let rest = pool.split_off(count.min(pool.len()));
    leftovers.extend(rest);
    pool
}
