//! Recommendation layer
//!
//! Ranks events with the scoring functions of the `folio-similarity` crate.
//! This module provides the adapter between graph events and those scores.

pub mod insights;

use crate::config::RecommendConfig;
use crate::graph::event::date_to_millis;
use crate::graph::{connection_kind, ConnectionKind, Event};
use chrono::NaiveDate;
use folio_similarity::{compare, ProfileData};
use serde::Serialize;

// Re-export scoring primitives
pub use folio_similarity::{group_similarity, similarity, SimilarityBreakdown, SimilarityWeights};
pub use insights::{
    event_score, Complement, EventInsights, PortfolioSummary, Recommender, ScoredEvent,
    Suggestion, SuggestionKind, TagCount,
};

/// One ranked candidate relative to a target event
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub event: &'a Event,
    pub similarity: f64,
    pub details: SimilarityBreakdown,
}

/// Rank `candidates` by similarity to `target`, best first.
///
/// The target itself and the center are skipped. Ties keep candidate order.
pub fn recommendations_for<'a, I>(target: &Event, candidates: I, limit: Option<usize>) -> Vec<Recommendation<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut ranked: Vec<Recommendation<'a>> = candidates
        .into_iter()
        .filter(|e| e.id != target.id && !e.is_center)
        .map(|event| {
            let details = compare(target, event);
            Recommendation {
                event,
                similarity: details.overall(),
                details,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Score of one unordered pair of regular events
#[derive(Debug, Clone, Serialize)]
pub struct PairSimilarity<'a> {
    pub first: &'a Event,
    pub second: &'a Event,
    pub similarity: f64,
    /// Connection the pair would get, if any
    pub kind: Option<ConnectionKind>,
}

/// Every pair of regular events, most similar first
pub fn all_similarities<'a, I>(events: I) -> Vec<PairSimilarity<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let regular: Vec<&Event> = events.into_iter().filter(|e| !e.is_center).collect();
    let mut pairs = Vec::with_capacity(regular.len() * regular.len().saturating_sub(1) / 2);

    for (i, &first) in regular.iter().enumerate() {
        for &second in &regular[i + 1..] {
            pairs.push(PairSimilarity {
                first,
                second,
                similarity: similarity(first, second),
                kind: connection_kind(first, second),
            });
        }
    }

    pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    pairs
}

/// Virtual "ideal self" profile the development scores compare against
pub fn center_profile(config: &RecommendConfig, today: NaiveDate) -> ProfileData {
    ProfileData {
        tags: config.center_profile_tags.clone(),
        budget: 0.0,
        participants: 1.0,
        date_millis: date_to_millis(today),
    }
}

pub fn similarity_to_center(event: &Event, config: &RecommendConfig, today: NaiveDate) -> f64 {
    similarity(event, &center_profile(config, today))
}

/// Development direction of an event: the first tag with a known direction
/// wins, matched case-insensitively.
pub fn development_direction<'c>(event: &Event, config: &'c RecommendConfig) -> &'c str {
    event
        .tags
        .iter()
        .find_map(|tag| config.directions.get(&tag.to_lowercase()))
        .map(String::as_str)
        .unwrap_or(config.default_direction.as_str())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentRecommendation<'a> {
    pub event: &'a Event,
    pub similarity: f64,
    /// `min(100, similarity * 100)`
    pub development_potential: f64,
    pub direction: String,
}

/// Regular events ranked by development potential relative to the center
/// profile
pub fn development_recommendations<'a, I>(
    events: I,
    config: &RecommendConfig,
    today: NaiveDate,
    limit: usize,
) -> Vec<DevelopmentRecommendation<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let profile = center_profile(config, today);
    let mut ranked: Vec<DevelopmentRecommendation<'a>> = events
        .into_iter()
        .filter(|e| !e.is_center)
        .map(|event| {
            let similarity = similarity(event, &profile);
            DevelopmentRecommendation {
                event,
                similarity,
                development_potential: (similarity * 100.0).min(100.0),
                direction: development_direction(event, config).to_string(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.development_potential.total_cmp(&a.development_potential));
    ranked.truncate(limit);
    ranked
}

/// Coarse bucket used when rendering a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityClass {
    High,
    Medium,
    Low,
}

impl SimilarityClass {
    pub fn of(score: f64) -> Self {
        if score >= 1.5 {
            SimilarityClass::High
        } else if score >= 1.0 {
            SimilarityClass::Medium
        } else {
            SimilarityClass::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityClass::High => "high",
            SimilarityClass::Medium => "medium",
            SimilarityClass::Low => "low",
        }
    }
}
