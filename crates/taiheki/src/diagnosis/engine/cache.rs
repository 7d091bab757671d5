use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::super::domain::{Answer, TypeScores};
use super::super::error::ScoringFault;

fn sorted_selection(answer: &Answer) -> Vec<usize> {
    let mut selection = answer.selected_options.clone();
    selection.sort_unstable();
    selection
}

/// Canonical `qid:opt,opt|qid:opt` encoding of an answer batch, ordered by question id
/// and then by the sorted selection.
pub(crate) fn canonical_pattern(answers: &[Answer]) -> String {
    let mut ordered: Vec<(u32, Vec<usize>)> = answers
        .iter()
        .map(|answer| (answer.question_id, sorted_selection(answer)))
        .collect();
    ordered.sort_unstable();

    ordered
        .into_iter()
        .map(|(question_id, selection)| {
            let options = selection
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("{question_id}:{options}")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// SHA-256 hex digest of the canonical answer pattern.
///
/// Batches that differ only in submission order, or in the order of options
/// within an answer, hash identically.
pub fn answer_pattern_hash(answers: &[Answer]) -> String {
    hex::encode(Sha256::digest(canonical_pattern(answers).as_bytes()))
}

/// Point-in-time view of the score cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// `None` until the cache has served at least one lookup.
    pub hit_rate: Option<f64>,
}

pub(crate) struct ScoreCache {
    entries: Option<Mutex<LruCache<String, TypeScores>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScoreCache {
    pub(crate) fn new(capacity: usize) -> Self {
        let entries = NonZeroUsize::new(capacity).map(|bound| Mutex::new(LruCache::new(bound)));
        Self {
            entries,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns cached scores for `key`, computing and storing them on a miss.
    pub(crate) fn get_or_compute<F>(
        &self,
        key: &str,
        compute: F,
    ) -> Result<TypeScores, ScoringFault>
    where
        F: FnOnce() -> Result<TypeScores, ScoringFault>,
    {
        let Some(entries) = &self.entries else {
            return compute();
        };

        let cached = entries
            .lock()
            .map_err(|_| ScoringFault::CachePoisoned)?
            .get(key)
            .copied();
        if let Some(scores) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(scores);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let scores = compute()?;
        entries
            .lock()
            .map_err(|_| ScoringFault::CachePoisoned)?
            .put(key.to_string(), scores);
        Ok(scores)
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let size = self.entries.as_ref().map_or(0, |entries| match entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        });
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            size,
            capacity: self.capacity,
            hits,
            misses,
            hit_rate: (lookups > 0).then(|| hits as f64 / lookups as f64),
        }
    }

    /// Drops every entry and resets the counters.
    pub(crate) fn clear(&self) {
        if let Some(entries) = &self.entries {
            match entries.lock() {
                Ok(mut guard) => guard.clear(),
                Err(poisoned) => poisoned.into_inner().clear(),
            }
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::domain::TaihekiType;

    fn scores_with(ty: TaihekiType, points: i64) -> TypeScores {
        let mut scores = TypeScores::default();
        scores.add(ty, points);
        scores
    }

    #[test]
    fn pattern_is_canonical() {
        let forward = [Answer::new(2, [3, 0]), Answer::new(1, [1])];
        let shuffled = [Answer::new(1, [1]), Answer::new(2, [0, 3])];

        assert_eq!(canonical_pattern(&forward), "1:1|2:0,3");
        assert_eq!(answer_pattern_hash(&forward), answer_pattern_hash(&shuffled));
        assert_eq!(answer_pattern_hash(&forward).len(), 64);
    }

    #[test]
    fn different_selections_hash_differently() {
        assert_ne!(
            answer_pattern_hash(&[Answer::new(1, [0])]),
            answer_pattern_hash(&[Answer::new(1, [1])])
        );
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = ScoreCache::new(4);
        let mut computed = 0;

        for _ in 0..2 {
            let scores = cache
                .get_or_compute("k", || {
                    computed += 1;
                    Ok(scores_with(TaihekiType::Type2, 3))
                })
                .expect("scores");
            assert_eq!(scores.get(TaihekiType::Type2), 3);
        }

        let stats = cache.stats();
        assert_eq!(computed, 1);
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
        assert_eq!(stats.hit_rate, Some(0.5));
    }

    #[test]
    fn capacity_bounds_entries() {
        let cache = ScoreCache::new(2);
        for key in ["a", "b", "c"] {
            cache
                .get_or_compute(key, || Ok(TypeScores::default()))
                .expect("scores");
        }

        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = ScoreCache::new(0);
        let mut computed = 0;
        for _ in 0..3 {
            cache
                .get_or_compute("k", || {
                    computed += 1;
                    Ok(TypeScores::default())
                })
                .expect("scores");
        }

        let stats = cache.stats();
        assert_eq!(computed, 3);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_rate, None);
    }

    #[test]
    fn clear_resets_entries_and_counters() {
        let cache = ScoreCache::new(2);
        cache
            .get_or_compute("k", || Ok(TypeScores::default()))
            .expect("scores");

        cache.clear();

        let stats = cache.stats();
        assert_eq!((stats.size, stats.hits, stats.misses), (0, 0, 0));
    }
}
