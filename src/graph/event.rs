//! Portfolio event entity
//!
//! An event is one achievement or activity rendered as a node. Input arrives
//! loosely typed (tags as text or list, numbers as text or numbers) and is
//! coerced to documented defaults instead of failing.

use super::tags::{normalize_tag, TagList};
use super::types::EventId;
use crate::canvas::Point;
use chrono::{DateTime, NaiveDate};
use folio_similarity::Profile;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New entry";
pub const DEFAULT_PORTFOLIO_TYPE: &str = "project";
pub const DEFAULT_BUDGET: i64 = 0;
pub const DEFAULT_PARTICIPANTS: i64 = 1;
pub const CENTER_TITLE: &str = "You";
pub const CENTER_TAG: &str = "#center_point";
const MISSING_DATE: &str = "Not specified";

/// A number that may arrive as an integer, a float or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Leading-integer interpretation: floats truncate, text is read up to
    /// the first non-digit. `None` when nothing numeric is found.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(i) => Some(*i),
            LooseNumber::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            LooseNumber::Float(_) => None,
            LooseNumber::Text(text) => parse_leading_int(text),
        }
    }
}

impl From<i64> for LooseNumber {
    fn from(value: i64) -> Self {
        LooseNumber::Int(value)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        LooseNumber::Text(value.to_string())
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| n * sign)
}

fn coerce_budget(value: Option<&LooseNumber>) -> i64 {
    match value.and_then(LooseNumber::as_int) {
        Some(n) if n >= 0 => n,
        _ => DEFAULT_BUDGET,
    }
}

fn coerce_participants(value: Option<&LooseNumber>) -> i64 {
    match value.and_then(LooseNumber::as_int) {
        Some(n) if n >= 1 => n,
        _ => DEFAULT_PARTICIPANTS,
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp. Anything else is no date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Human format used by the info panel
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d.%m.%Y").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

/// UTC midnight of the date, in Unix milliseconds
pub fn date_to_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis())
}

/// Loosely typed record used for creation and partial updates.
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub id: Option<EventId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub portfolio_type: Option<String>,
    /// Older records carry the category under `type`
    #[serde(rename = "type")]
    pub legacy_type: Option<String>,
    pub result: Option<String>,
    pub reflection: Option<String>,
    pub tags: Option<TagList>,
    pub errors: Option<TagList>,
    pub contacts: Option<String>,
    pub budget: Option<LooseNumber>,
    pub date: Option<String>,
    pub participants: Option<LooseNumber>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub is_center: Option<bool>,
}

impl EventInput {
    pub fn new(title: impl Into<String>) -> Self {
        EventInput {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, portfolio_type: impl Into<String>) -> Self {
        self.portfolio_type = Some(portfolio_type.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<TagList>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_errors(mut self, errors: impl Into<TagList>) -> Self {
        self.errors = Some(errors.into());
        self
    }

    pub fn with_contacts(mut self, contacts: impl Into<String>) -> Self {
        self.contacts = Some(contacts.into());
        self
    }

    pub fn with_budget(mut self, budget: impl Into<LooseNumber>) -> Self {
        self.budget = Some(budget.into());
        self
    }

    pub fn with_participants(mut self, participants: impl Into<LooseNumber>) -> Self {
        self.participants = Some(participants.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn as_center(mut self) -> Self {
        self.is_center = Some(true);
        self
    }

    pub fn is_center(&self) -> bool {
        self.is_center.unwrap_or(false)
    }

    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Filter criteria; an absent criterion always passes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    /// Case-insensitive substring matched against every tag
    pub tag: Option<String>,
    #[serde(rename = "type")]
    pub portfolio_type: Option<String>,
    #[serde(default)]
    pub only_with_errors: bool,
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound, covering the whole day
    pub date_to: Option<NaiveDate>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.tag).is_none()
            && non_empty(&self.portfolio_type).is_none()
            && !self.only_with_errors
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Read-only projection for the info panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub portfolio_type: String,
    pub tags: String,
    pub errors: String,
    pub result: String,
    pub date: String,
    pub reflection: String,
    pub contacts: String,
    pub budget: i64,
    pub participants: i64,
}

/// A portfolio record. Positions are world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub portfolio_type: String,
    pub result: String,
    pub reflection: String,
    pub tags: Vec<String>,
    pub errors: Vec<String>,
    pub contacts: String,
    pub budget: i64,
    pub date: Option<NaiveDate>,
    pub participants: i64,
    pub x: f64,
    pub y: f64,
    pub is_center: bool,
}

impl Event {
    /// Build an event from a loose record, falling back to defaults
    pub fn create(id: EventId, input: &EventInput) -> Self {
        let portfolio_type = non_empty(&input.portfolio_type)
            .or_else(|| non_empty(&input.legacy_type))
            .unwrap_or(DEFAULT_PORTFOLIO_TYPE)
            .to_string();

        Event {
            id,
            title: non_empty(&input.title).unwrap_or(DEFAULT_TITLE).to_string(),
            description: input.description.clone().unwrap_or_default(),
            portfolio_type,
            result: input.result.clone().unwrap_or_default(),
            reflection: input.reflection.clone().unwrap_or_default(),
            tags: input.tags.as_ref().map(TagList::to_tags).unwrap_or_default(),
            errors: input.errors.as_ref().map(TagList::to_tags).unwrap_or_default(),
            contacts: input.contacts.clone().unwrap_or_default(),
            budget: coerce_budget(input.budget.as_ref()),
            date: input.date.as_deref().and_then(parse_date),
            participants: coerce_participants(input.participants.as_ref()),
            x: input.x.unwrap_or(0.0),
            y: input.y.unwrap_or(0.0),
            is_center: input.is_center(),
        }
    }

    /// The distinguished "self" node
    pub fn center() -> Self {
        let input = EventInput::new(CENTER_TITLE).with_tags(CENTER_TAG).as_center();
        Event::create(EventId::CENTER, &input)
    }

    /// Merge a partial record: only present keys are applied.
    /// Identity (`id`) and role (`isCenter`) are never changed here.
    pub fn update(&mut self, input: &EventInput) {
        if let Some(title) = &input.title {
            self.title = title.clone();
        }
        if let Some(description) = &input.description {
            self.description = description.clone();
        }
        if let Some(portfolio_type) = input.portfolio_type.as_ref().or(input.legacy_type.as_ref()) {
            self.portfolio_type = portfolio_type.clone();
        }
        if let Some(result) = &input.result {
            self.result = result.clone();
        }
        if let Some(reflection) = &input.reflection {
            self.reflection = reflection.clone();
        }
        if let Some(tags) = &input.tags {
            self.tags = tags.to_tags();
        }
        if let Some(errors) = &input.errors {
            self.errors = errors.to_tags();
        }
        if let Some(contacts) = &input.contacts {
            self.contacts = contacts.clone();
        }
        if input.budget.is_some() {
            self.budget = coerce_budget(input.budget.as_ref());
        }
        if let Some(date) = &input.date {
            self.date = parse_date(date);
        }
        if input.participants.is_some() {
            self.participants = coerce_participants(input.participants.as_ref());
        }
        if let Some(x) = input.x {
            self.x = x;
        }
        if let Some(y) = input.y {
            self.y = y;
        }
    }

    /// True iff every provided criterion passes.
    /// An event without a date fails any filter with a date bound.
    pub fn matches_filter(&self, filter: &EventFilter) -> bool {
        if let Some(tag) = non_empty(&filter.tag) {
            let needle = normalize_tag(tag).to_lowercase();
            if !self.tags.iter().any(|t| t.to_lowercase().contains(&needle)) {
                return false;
            }
        }

        if let Some(portfolio_type) = non_empty(&filter.portfolio_type) {
            if self.portfolio_type != portfolio_type {
                return false;
            }
        }

        if filter.only_with_errors && self.errors.is_empty() {
            return false;
        }

        if filter.date_from.is_some() || filter.date_to.is_some() {
            let Some(date) = self.date else {
                return false;
            };
            if filter.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if filter.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    pub fn display_info(&self) -> DisplayInfo {
        DisplayInfo {
            title: self.title.clone(),
            description: self.description.clone(),
            portfolio_type: self.portfolio_type.clone(),
            tags: self.tags.join(", "),
            errors: self.errors.join(", "),
            result: self.result.clone(),
            date: format_date(self.date),
            reflection: self.reflection.clone(),
            contacts: self.contacts.clone(),
            budget: self.budget,
            participants: self.participants,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Store a new world position
    pub fn move_to(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}

impl Profile for Event {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn budget(&self) -> f64 {
        self.budget as f64
    }

    fn participants(&self) -> f64 {
        self.participants as f64
    }

    fn date_millis(&self) -> Option<i64> {
        self.date.and_then(date_to_millis)
    }
}
