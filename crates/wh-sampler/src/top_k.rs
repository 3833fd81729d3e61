use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::candidate::TokenScore;

/// Min-heap entry; reversed ordering so `BinaryHeap` keeps the weakest
/// surviving score at the top.
#[derive(Debug)]
struct HeapEntry {
    logit: f32,
    id: u32,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.logit == other.logit && self.id == other.id
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lowest logit wins the heap top. Ties broken by id so the
        // ordering is total.
        other
            .logit
            .total_cmp(&self.logit)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Extract the `k` highest-scoring vocabulary entries from a logits vector,
/// in descending score order.
///
/// Entries masked to negative infinity are disallowed tokens and are
/// skipped, as are NaN scores. Runs in O(vocab · log k) with a bounded heap
/// of capacity `k`: the vocabulary is a couple hundred thousand entries wide
/// and a full sort per keystroke is not acceptable. If fewer than `k`
/// unmasked entries exist, all of them are returned.
pub fn top_scores(logits: &[f32], k: usize) -> Vec<TokenScore> {
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k);

    for (id, &logit) in logits.iter().enumerate() {
        if logit == f32::NEG_INFINITY || logit.is_nan() {
            continue;
        }
        let id = id as u32;
        if heap.len() < k {
            heap.push(HeapEntry { logit, id });
        } else if let Some(weakest) = heap.peek() {
            if logit > weakest.logit {
                heap.pop();
                heap.push(HeapEntry { logit, id });
            }
        }
    }

    let mut scores: Vec<TokenScore> = heap
        .into_iter()
        .map(|entry| TokenScore {
            id: entry.id,
            logit: entry.logit,
        })
        .collect();
    scores.sort_by(|a, b| b.logit.total_cmp(&a.logit));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_full_sort() {
        let logits: Vec<f32> = (0..1000)
            .map(|i| ((i * 7919) % 1000) as f32 / 3.0)
            .collect();

        let got = top_scores(&logits, 25);

        let mut expected: Vec<(usize, f32)> =
            logits.iter().copied().enumerate().collect();
        expected.sort_by(|a, b| b.1.total_cmp(&a.1));
        expected.truncate(25);

        assert_eq!(got.len(), 25);
        for (score, (id, logit)) in got.iter().zip(&expected) {
            assert_eq!(score.id as usize, *id);
            assert_eq!(score.logit, *logit);
        }
    }

    #[test]
    fn test_descending_order() {
        let got = top_scores(&[0.5, 9.0, -3.0, 4.0, 7.0], 3);
        let logits: Vec<f32> = got.iter().map(|s| s.logit).collect();
        assert_eq!(logits, vec![9.0, 7.0, 4.0]);
    }

    #[test]
    fn test_skips_negative_infinity() {
        let logits = [10.0, f32::NEG_INFINITY, 1.0, f32::NEG_INFINITY, 1.0];
        let got = top_scores(&logits, 5);
        assert_eq!(got.len(), 3);
        assert!(got.iter().all(|s| s.logit > f32::NEG_INFINITY));
        let ids: Vec<u32> = got.iter().map(|s| s.id).collect();
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&3));
    }

    #[test]
    fn test_fewer_unmasked_than_k() {
        let logits = [f32::NEG_INFINITY, 2.0, f32::NEG_INFINITY];
        let got = top_scores(&logits, 10);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 1);
    }

    #[test]
    fn test_k_zero_and_empty_logits() {
        assert!(top_scores(&[1.0, 2.0], 0).is_empty());
        assert!(top_scores(&[], 5).is_empty());
    }

    #[test]
    fn test_nan_is_skipped() {
        let got = top_scores(&[1.0, f32::NAN, 3.0], 3);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, 2);
    }
}
