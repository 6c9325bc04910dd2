//! Similarity scoring through the public API

use folio::graph::{Event, EventId, EventInput};
use folio::recommend::{group_similarity, similarity};
use folio_similarity::{compare, date_similarity, scalar_similarity, DAY_MILLIS};

fn event(id: u64, input: EventInput) -> Event {
    Event::create(EventId::new(id), &input)
}

fn corpus() -> Vec<Event> {
    vec![
        event(1, EventInput::new("a").with_tags("#ai #python #ai").with_budget(50_000_i64).with_date("2024-03-15")),
        event(2, EventInput::new("b").with_tags("#python").with_participants(200_i64).with_date("2024-04-20")),
        event(3, EventInput::new("c").with_tags("#react #frontend").with_budget(25_000_i64)),
        event(4, EventInput::new("d")),
        event(5, EventInput::new("e").with_tags("#ai").with_budget(1_i64).with_date("2024-03-01")),
    ]
}

#[test]
fn test_similarity_is_symmetric() {
    let events = corpus();
    for a in &events {
        for b in &events {
            let ab = compare(a, b);
            let ba = compare(b, a);
            assert_eq!(ab.tag_similarity, ba.tag_similarity, "{} vs {}", a.title, b.title);
            assert!((similarity(a, b) - similarity(b, a)).abs() < 1e-12);
        }
    }
}

#[test]
fn test_scores_stay_in_range() {
    let events = corpus();
    for a in &events {
        for b in &events {
            let breakdown = compare(a, b);
            for score in breakdown.as_array() {
                assert!((0.0..=2.0).contains(&score));
            }
            let overall = breakdown.overall();
            assert!((0.0..=2.0).contains(&overall));
        }
    }
}

#[test]
fn test_identical_events_score_two() {
    let a = event(1, EventInput::new("a").with_tags("#x #y").with_budget(10_i64).with_date("2024-01-01"));
    let b = event(2, EventInput::new("b").with_tags("#x #y").with_budget(10_i64).with_date("2024-01-01"));
    assert_eq!(compare(&a, &b).as_array(), [2.0; 4]);
    assert_eq!(similarity(&a, &b), 2.0);
}

#[test]
fn test_neutral_reference_value() {
    let a = event(1, EventInput::new("a").with_errors("#one"));
    let b = event(2, EventInput::new("b").with_errors("#two"));
    let expected = (10.0f64 / 4.0).sqrt();
    assert!((similarity(&a, &b) - expected).abs() < 1e-12);
}

#[test]
fn test_scalar_and_date_boundaries() {
    assert_eq!(scalar_similarity(100.0, 0.0), 0.0);
    assert_eq!(scalar_similarity(50.0, 50.0), 2.0);
    assert_eq!(date_similarity(Some(0), Some(15 * DAY_MILLIS)), 1.0);
    assert_eq!(date_similarity(Some(0), Some(30 * DAY_MILLIS)), 0.0);
    assert_eq!(date_similarity(Some(0), Some(400 * DAY_MILLIS)), 0.0);
    assert_eq!(date_similarity(None, Some(0)), 1.0);
}

#[test]
fn test_date_similarity_from_event_dates() {
    let a = event(1, EventInput::new("a").with_date("2024-03-01"));
    let b = event(2, EventInput::new("b").with_date("2024-03-16"));
    assert_eq!(compare(&a, &b).date_similarity, 1.0);
}

#[test]
fn test_group_similarity() {
    let events = corpus();
    let refs: Vec<&Event> = events.iter().collect();
    let group = group_similarity(&refs);

    let mut total = 0.0;
    let mut pairs = 0;
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            total += similarity(&events[i], &events[j]);
            pairs += 1;
        }
    }
    assert!((group - total / pairs as f64).abs() < 1e-12);
    assert_eq!(group_similarity::<Event>(&[]), 2.0);
}
