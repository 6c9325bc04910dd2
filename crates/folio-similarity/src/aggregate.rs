//! Combining the sub-scores into one similarity value

use crate::common::Profile;
use crate::measures::{date_similarity, scalar_similarity, tag_similarity};

/// Per-axis weights.
///
/// NOTE: weights are carried for API compatibility but are NOT applied; the
/// overall score is the unweighted quadratic mean of the four sub-scores.
/// Whether weighting before squaring is intended is an open product question.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityWeights {
    pub tags: f64,
    pub budget: f64,
    pub date: f64,
    pub participants: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            tags: 0.4,
            budget: 0.25,
            date: 0.2,
            participants: 0.15,
        }
    }
}

/// The four sub-scores behind one comparison
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimilarityBreakdown {
    pub tag_similarity: f64,
    pub budget_similarity: f64,
    pub date_similarity: f64,
    pub participants_similarity: f64,
}

impl SimilarityBreakdown {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.tag_similarity,
            self.budget_similarity,
            self.date_similarity,
            self.participants_similarity,
        ]
    }

    /// Quadratic mean of the sub-scores, in `[0, 2]`
    pub fn overall(&self) -> f64 {
        quadratic_mean(&self.as_array())
    }

    /// Same as [`overall`](Self::overall); `_weights` is accepted and ignored.
    pub fn overall_with(&self, _weights: &SimilarityWeights) -> f64 {
        self.overall()
    }
}

/// Root mean square. An empty slice yields `0`.
pub fn quadratic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = values.iter().map(|v| v * v).sum();
    (sum_of_squares / values.len() as f64).sqrt()
}

/// Compute all four sub-scores between two profiles
pub fn compare<A, B>(a: &A, b: &B) -> SimilarityBreakdown
where
    A: Profile + ?Sized,
    B: Profile + ?Sized,
{
    SimilarityBreakdown {
        tag_similarity: tag_similarity(a.tags(), b.tags()),
        budget_similarity: scalar_similarity(a.budget(), b.budget()),
        date_similarity: date_similarity(a.date_millis(), b.date_millis()),
        participants_similarity: scalar_similarity(a.participants(), b.participants()),
    }
}

/// Overall similarity between two profiles
pub fn similarity<A, B>(a: &A, b: &B) -> f64
where
    A: Profile + ?Sized,
    B: Profile + ?Sized,
{
    compare(a, b).overall()
}

/// Mean pairwise similarity inside a group. Fewer than two members score `2`.
pub fn group_similarity<P: Profile + ?Sized>(group: &[&P]) -> f64 {
    if group.len() < 2 {
        return 2.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..group.len() {
        for j in (i + 1)..group.len() {
            total += similarity(group[i], group[j]);
            pairs += 1;
        }
    }

    total / pairs as f64
}
