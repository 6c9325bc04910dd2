//! Per-event insights and the portfolio-wide summary

use super::{recommendations_for, Recommendation};
use crate::config::RecommendConfig;
use crate::graph::{Event, EventId, GraphStore};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// An event that broadens the target's portfolio
#[derive(Debug, Clone, Serialize)]
pub struct Complement<'a> {
    pub event: &'a Event,
    /// New-tag count, plus 2 for a different portfolio type
    pub score: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Improvement,
    Expansion,
    Completeness,
    Balance,
}

/// A next step the user could take for one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, title: &str, description: impl Into<String>) -> Self {
        Suggestion {
            kind,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInsights<'a> {
    pub similar: Vec<Recommendation<'a>>,
    pub complementary: Vec<Complement<'a>>,
    pub next_steps: Vec<Suggestion>,
    pub insight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredEvent<'a> {
    pub event: &'a Event,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary<'a> {
    pub trending_tags: Vec<TagCount>,
    pub common_mistakes: Vec<TagCount>,
    pub top_events: Vec<ScoredEvent<'a>>,
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// How strong an entry is for a portfolio, roughly 0..=125.
///
/// Filled description, result and reflection give 15 each; a date and a
/// type 10 each; tags 8 each up to 40; no recorded errors 10; and a
/// freshness bonus of up to 10 that loses one point per 30 days from `today`.
pub fn event_score(event: &Event, today: NaiveDate) -> f64 {
    let mut score = 0.0;

    for field in [&event.description, &event.result, &event.reflection] {
        if has_text(field) {
            score += 15.0;
        }
    }
    if event.date.is_some() {
        score += 10.0;
    }
    if !event.portfolio_type.is_empty() {
        score += 10.0;
    }

    score += (event.tags.len() as f64 * 8.0).min(40.0);

    if event.errors.is_empty() {
        score += 10.0;
    }

    if let Some(date) = event.date {
        let days = (today - date).num_days().abs() as f64;
        score += (10.0 - (days / 30.0).min(10.0)).max(0.0);
    }

    score
}

/// Counts in descending order; ties keep first-seen order
fn top_counts<'a, I>(items: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_default() += 1;
    }

    let mut counts: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Insight engine over one graph
pub struct Recommender<'a> {
    store: &'a GraphStore,
    config: &'a RecommendConfig,
    today: NaiveDate,
}

impl<'a> Recommender<'a> {
    pub fn new(store: &'a GraphStore, config: &'a RecommendConfig, today: NaiveDate) -> Self {
        Recommender { store, config, today }
    }

    /// Insights for a regular event; `None` for unknown ids and the center
    pub fn for_event(&self, id: EventId) -> Option<EventInsights<'a>> {
        let store: &'a GraphStore = self.store;
        let event = store.events().find(|e| e.id == id)?;

        Some(EventInsights {
            similar: recommendations_for(event, store.events(), Some(self.config.similar_limit)),
            complementary: self.complementary(event),
            next_steps: self.next_steps(event),
            insight: insight_line(event),
        })
    }

    /// Events that add skills the target lacks or a different type
    pub fn complementary(&self, target: &Event) -> Vec<Complement<'a>> {
        let target_tags: HashSet<&str> = target.tags.iter().map(String::as_str).collect();

        let mut ranked: Vec<Complement<'a>> = self
            .store
            .events()
            .filter(|e| e.id != target.id)
            .map(|event| {
                let new_tags: Vec<&str> = event
                    .tags
                    .iter()
                    .map(String::as_str)
                    .filter(|t| !target_tags.contains(t))
                    .collect();
                let other_type = !event.portfolio_type.is_empty()
                    && !target.portfolio_type.is_empty()
                    && event.portfolio_type != target.portfolio_type;

                let reason = if new_tags.is_empty() {
                    "Complements the portfolio with a different kind of activity".to_string()
                } else {
                    let shown: Vec<&str> = new_tags.iter().take(3).copied().collect();
                    format!("Adds new skills: {}", shown.join(", "))
                };

                Complement {
                    event,
                    score: new_tags.len() + if other_type { 2 } else { 0 },
                    reason,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(self.config.complementary_limit);
        ranked
    }

    pub fn next_steps(&self, target: &Event) -> Vec<Suggestion> {
        let mut steps = Vec::new();

        if !target.errors.is_empty() {
            let shown: Vec<&str> = target.errors.iter().take(2).map(String::as_str).collect();
            steps.push(Suggestion::new(
                SuggestionKind::Improvement,
                "Work on weak spots",
                format!("Pay attention to: {}", shown.join(", ")),
            ));
        }

        if target.tags.len() < 2 {
            steps.push(Suggestion::new(
                SuggestionKind::Expansion,
                "Add skills",
                "Add 2-4 skill tags so recommendations can point you further",
            ));
        }

        if !has_text(&target.description) {
            steps.push(Suggestion::new(
                SuggestionKind::Completeness,
                "Add a description",
                "Briefly describe what exactly you did (1-2 sentences)",
            ));
        }
        if !has_text(&target.result) {
            steps.push(Suggestion::new(
                SuggestionKind::Completeness,
                "Record the result",
                "State the outcome: place, certificate, goal reached",
            ));
        }
        if !has_text(&target.reflection) {
            steps.push(Suggestion::new(
                SuggestionKind::Completeness,
                "Add a reflection",
                "Write down what you learned or improved",
            ));
        }

        let has_other_type = self
            .store
            .events()
            .any(|e| !e.portfolio_type.is_empty() && e.portfolio_type != target.portfolio_type);
        if !has_other_type {
            steps.push(Suggestion::new(
                SuggestionKind::Balance,
                "Balance the portfolio",
                "Add an entry of another type (olympiad, volunteering, course)",
            ));
        }

        steps
    }

    /// Trending tags, common mistakes and the strongest entries
    pub fn summary(&self) -> PortfolioSummary<'a> {
        let store: &'a GraphStore = self.store;
        let limit = self.config.summary_limit;

        let mut top_events: Vec<ScoredEvent<'a>> = store
            .events()
            .map(|event| ScoredEvent {
                event,
                score: event_score(event, self.today),
            })
            .collect();
        top_events.sort_by(|a, b| b.score.total_cmp(&a.score));
        top_events.truncate(limit);

        PortfolioSummary {
            trending_tags: top_counts(store.events().flat_map(|e| &e.tags), limit),
            common_mistakes: top_counts(store.events().flat_map(|e| &e.errors), limit),
            top_events,
        }
    }
}

/// One-line completeness digest of an event
pub fn insight_line(event: &Event) -> String {
    let filled = [
        !event.description.is_empty(),
        !event.result.is_empty(),
        !event.reflection.is_empty(),
        event.date.is_some(),
    ]
    .iter()
    .filter(|f| **f)
    .count();

    let mut parts = vec![format!("Completeness: {}/4.", filled)];

    if event.errors.is_empty() {
        parts.push("No errors or remarks.".to_string());
    } else {
        parts.push(format!("Improvements noted: {}.", event.errors.len()));
    }
    if event.tags.len() >= 4 {
        parts.push("Good skill detail.".to_string());
    }
    if !event.portfolio_type.is_empty() {
        parts.push(format!("Type: {}.", event.portfolio_type));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EventInput;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn store() -> (GraphStore, EventId, EventId, EventId) {
        let mut store = GraphStore::with_center();
        let a = store
            .add_event(
                &EventInput::new("Hackathon")
                    .with_type("competition")
                    .with_tags("#ai #python")
                    .with_errors("#poor_docs #late"),
            )
            .unwrap();
        let b = store
            .add_event(
                &EventInput::new("Course")
                    .with_type("course")
                    .with_tags("#python #sql #stats")
                    .with_errors("#late"),
            )
            .unwrap();
        let c = store
            .add_event(
                &EventInput::new("Talk")
                    .with_type("competition")
                    .with_tags("#ai")
                    .with_description("Gave a talk")
                    .with_result("Invited again")
                    .with_reflection("Practice more")
                    .with_date("2024-06-01"),
            )
            .unwrap();
        (store, a, b, c)
    }

    #[test]
    fn test_event_score() {
        let full = Event::create(
            EventId::new(1),
            &EventInput::new("x")
                .with_description("d")
                .with_result("r")
                .with_reflection("f")
                .with_tags("#a #b #c #d #e #f")
                .with_date("2024-06-01"),
        );
        // 45 + 10 + 10 + 40 + 10 + 10
        assert_eq!(event_score(&full, today()), 125.0);

        let stale = Event::create(EventId::new(2), &EventInput::new("y").with_date("2023-06-02").with_errors("#e"));
        // date 10 + type 10, freshness used up after a year
        assert_eq!(event_score(&stale, today()), 20.0);

        let blank = Event::create(EventId::new(3), &EventInput::new("   ").with_description("  "));
        assert_eq!(event_score(&blank, today()), 20.0);
    }

    #[test]
    fn test_complementary_ranking() {
        let (store, a, b, _) = store();
        let config = RecommendConfig::default();
        let recommender = Recommender::new(&store, &config, today());

        let target = store.get_event(a).unwrap();
        let complements = recommender.complementary(target);
        assert_eq!(complements.len(), 2);
        // #sql #stats + different type
        assert_eq!(complements[0].event.id, b);
        assert_eq!(complements[0].score, 4);
        assert_eq!(complements[0].reason, "Adds new skills: #sql, #stats");
        assert_eq!(complements[1].score, 0);
        assert_eq!(
            complements[1].reason,
            "Complements the portfolio with a different kind of activity"
        );
    }

    #[test]
    fn test_next_steps() {
        let (store, a, _, c) = store();
        let config = RecommendConfig::default();
        let recommender = Recommender::new(&store, &config, today());

        let kinds: Vec<SuggestionKind> = recommender
            .next_steps(store.get_event(a).unwrap())
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::Improvement,
                SuggestionKind::Completeness,
                SuggestionKind::Completeness,
                SuggestionKind::Completeness,
            ]
        );

        let steps = recommender.next_steps(store.get_event(c).unwrap());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, SuggestionKind::Expansion);
    }

    #[test]
    fn test_balance_suggestion_when_single_type() {
        let mut store = GraphStore::new();
        let id = store
            .add_event(&EventInput::new("a").with_tags("#x #y").with_description("d").with_result("r").with_reflection("f"))
            .unwrap();
        let config = RecommendConfig::default();
        let recommender = Recommender::new(&store, &config, today());

        let steps = recommender.next_steps(store.get_event(id).unwrap());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, SuggestionKind::Balance);
    }

    #[test]
    fn test_for_event() {
        let (store, a, _, c) = store();
        let config = RecommendConfig { similar_limit: 1, ..Default::default() };
        let recommender = Recommender::new(&store, &config, today());

        let insights = recommender.for_event(a).unwrap();
        assert_eq!(insights.similar.len(), 1);
        assert!(insights.similar.iter().all(|r| r.event.id != a));
        assert_eq!(
            insights.insight,
            "Completeness: 0/4. Improvements noted: 2. Type: competition."
        );

        let insights = recommender.for_event(c).unwrap();
        assert_eq!(insights.insight, "Completeness: 4/4. No errors or remarks. Type: competition.");

        assert!(recommender.for_event(EventId::CENTER).is_none());
        assert!(recommender.for_event(EventId::new(99)).is_none());
    }

    #[test]
    fn test_summary() {
        let (store, _, _, c) = store();
        let config = RecommendConfig { summary_limit: 2, ..Default::default() };
        let summary = Recommender::new(&store, &config, today()).summary();

        assert_eq!(
            summary.trending_tags,
            vec![
                TagCount { tag: "#ai".to_string(), count: 2 },
                TagCount { tag: "#python".to_string(), count: 2 },
            ]
        );
        assert_eq!(summary.common_mistakes[0], TagCount { tag: "#late".to_string(), count: 2 });
        assert_eq!(summary.common_mistakes[1].tag, "#poor_docs");
        assert_eq!(summary.top_events.len(), 2);
        assert_eq!(summary.top_events[0].event.id, c);
    }
}
