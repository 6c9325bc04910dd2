//! Shared inputs for the similarity measures

use std::collections::HashSet;

/// The four attributes the engine compares.
///
/// Implemented by the graph's event entity and by synthetic profiles such as
/// the "ideal self" used for development recommendations.
pub trait Profile {
    /// Normalized `#`-prefixed skill tags (duplicates allowed)
    fn tags(&self) -> &[String];

    fn budget(&self) -> f64;

    fn participants(&self) -> f64;

    /// Date as Unix milliseconds (UTC midnight for calendar dates)
    fn date_millis(&self) -> Option<i64>;
}

/// Plain owned profile, handy for virtual comparison targets
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileData {
    pub tags: Vec<String>,
    pub budget: f64,
    pub participants: f64,
    pub date_millis: Option<i64>,
}

impl Profile for ProfileData {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn budget(&self) -> f64 {
        self.budget
    }

    fn participants(&self) -> f64 {
        self.participants
    }

    fn date_millis(&self) -> Option<i64> {
        self.date_millis
    }
}

/// True when the two sequences share at least one element.
/// An empty side never shares anything.
pub fn has_common<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let right: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    a.iter().any(|x| right.contains(x.as_ref()))
}
