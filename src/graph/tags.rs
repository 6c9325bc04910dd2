//! Tag normalization
//!
//! Skill tags and error tags share one form: a non-empty string starting
//! with `#`. User input arrives either as a list or as free text separated
//! by commas and/or spaces.

use serde::{Deserialize, Serialize};

/// Prefix `#` unless already present. Empty input stays empty.
pub fn normalize_tag(tag: &str) -> String {
    if tag.is_empty() {
        return String::new();
    }
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{}", tag)
    }
}

/// Split free text on runs of commas and spaces into normalized tags.
/// Empty pieces and a bare `#` are dropped.
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split([',', ' '])
        .map(|piece| normalize_tag(piece.trim()))
        .filter(|tag| is_meaningful(tag))
        .collect()
}

fn is_meaningful(tag: &str) -> bool {
    !tag.is_empty() && tag != "#"
}

/// Tags as they arrive in an input record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Text(String),
}

impl TagList {
    /// Normalized tags, in input order, duplicates kept
    pub fn to_tags(&self) -> Vec<String> {
        match self {
            TagList::Text(text) => parse_tags(text),
            TagList::List(items) => items
                .iter()
                .map(|item| normalize_tag(item.trim()))
                .filter(|tag| is_meaningful(tag))
                .collect(),
        }
    }
}

impl From<&str> for TagList {
    fn from(text: &str) -> Self {
        TagList::Text(text.to_string())
    }
}

impl From<Vec<String>> for TagList {
    fn from(items: Vec<String>) -> Self {
        TagList::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("rust"), "#rust");
        assert_eq!(normalize_tag("#rust"), "#rust");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn test_parse_tags_mixed_delimiters() {
        let tags = parse_tags("#hackathon, ai  python,,#");
        assert_eq!(tags, vec!["#hackathon", "#ai", "#python"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , # ,").is_empty());
    }

    #[test]
    fn test_parse_tags_keeps_duplicates() {
        assert_eq!(parse_tags("a a"), vec!["#a", "#a"]);
    }

    #[test]
    fn test_tag_list_from_json() {
        let text: TagList = serde_json::from_str("\"ai,#ml\"").unwrap();
        assert_eq!(text.to_tags(), vec!["#ai", "#ml"]);

        let list: TagList = serde_json::from_str("[\"#ai\", \"ml\", \"\"]").unwrap();
        assert_eq!(list.to_tags(), vec!["#ai", "#ml"]);
    }
}
