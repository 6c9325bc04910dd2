//! Demo records for a fresh workspace

use crate::graph::EventInput;

/// Three example entries shown before a user has saved anything
pub fn sample_events() -> Vec<EventInput> {
    vec![
        EventInput::new("AI Hackathon")
            .with_tags("#hackathon,#artificial_intelligence,#python")
            .with_errors("#poor_documentation")
            .with_contacts("org@hackathon.ai")
            .with_budget("50000")
            .with_date("2024-03-15")
            .with_participants("50"),
        EventInput::new("DevDays Conference")
            .with_tags("#conference,#development,#networking")
            .with_errors("#slow_registration")
            .with_contacts("info@devdays.kz")
            .with_budget("100000")
            .with_date("2024-04-20")
            .with_participants("200"),
        EventInput::new("React Workshop")
            .with_tags("#workshop,#react,#frontend")
            .with_errors("#little_practice")
            .with_contacts("workshop@react.kz")
            .with_budget("25000")
            .with_date("2024-02-10")
            .with_participants("30"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Event, EventId};

    #[test]
    fn test_samples_coerce_cleanly() {
        let events: Vec<Event> = sample_events()
            .iter()
            .enumerate()
            .map(|(i, input)| Event::create(EventId::new(i as u64 + 1), input))
            .collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].budget, 50_000);
        assert_eq!(events[1].participants, 200);
        assert_eq!(events[2].tags, vec!["#workshop", "#react", "#frontend"]);
        assert!(events.iter().all(|e| e.date.is_some() && !e.is_center));
    }
}
