//! core/fields.rs
//! Front-matter field lookup rules, in one place.
//!
//! Every "use X, else Y" decision is an ordered chain of keys here, so precedence
//! is testable without going through the sync service or the XML layer.

use serde_json::Value;

use super::types::EpisodeMetadata;

/// Media reference: audio wins over video.
pub const MEDIA_REFERENCE: &[&str] = &["audio_file", "video_file"];

/// Summary text (channel and item). Items fall back further to the feed item's description.
pub const SUMMARY: &[&str] = &["itunes_summary", "description"];

/// Episode author. Items fall back further to the feed item's author.
pub const AUTHOR: &[&str] = &["itunes_author"];

/// Channel type (`episodic` / `serial`).
pub const SHOW_TYPE: &[&str] = &["itunes_type"];
pub const DEFAULT_SHOW_TYPE: &str = "episodic";

/// First key in `chain` that holds non-empty scalar text.
pub fn first_text(meta: &EpisodeMetadata, chain: &[&str]) -> Option<String> {
    chain.iter().find_map(|key| meta.non_empty(key))
}

/// First candidate that is present and not blank.
///
/// Used where a chain crosses from front matter into a feed object's own fields.
pub fn first_present<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// Scalar rendered as text. Lists/maps have no single text form.
pub fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose "has a value" check: null, false, 0, "", "0" and [] are all empty.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `itunes:explicit` value: only the literal string "true" or boolean true map to "true".
pub fn normalize_explicit(v: &Value) -> &'static str {
    match v {
        Value::Bool(true) => "true",
        Value::String(s) if s == "true" => "true",
        _ => "false",
    }
}

/// Integer coercion for episode/season numbers.
///
/// - numbers truncate (`3.9` -> 3)
/// - strings use their leading integer (`"12"`, `" 7 "`, `"4b"` -> 4)
/// - `true` -> 1
///
/// Returns None for absent/falsy values and for strings with no leading digits,
/// so callers simply omit the node.
pub fn coerce_int(v: &Value) -> Option<i64> {
    if !is_truthy(v) {
        return None;
    }

    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::Bool(true) => Some(1),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// One `itunes:category` entry, optionally with a single sub-category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub text: String,
    pub child: Option<String>,
}

impl Category {
    /// `"Technology > Podcasting"` splits at the first `>`; anything else is flat.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('>') {
            Some((parent, child)) => Self {
                text: parent.trim().to_string(),
                child: Some(child.trim().to_string()),
            },
            None => Self {
                text: raw.trim().to_string(),
                child: None,
            },
        }
    }
}

/// A category field may be one string or an ordered list; each entry is handled on its own.
/// Blank entries (and blank parents like `" > X"`) are dropped.
pub fn categories(v: &Value) -> Vec<Category> {
    let raw: Vec<String> = match v {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    };

    raw.iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| Category::parse(s))
        .filter(|c| !c.text.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_chain_prefers_dedicated_field() {
        let meta = EpisodeMetadata::new()
            .with("itunes_summary", "short")
            .with("description", "long");
        assert_eq!(first_text(&meta, SUMMARY).as_deref(), Some("short"));

        let meta = EpisodeMetadata::new().with("description", "long");
        assert_eq!(first_text(&meta, SUMMARY).as_deref(), Some("long"));

        let meta = EpisodeMetadata::new().with("itunes_summary", "");
        assert_eq!(first_text(&meta, SUMMARY), None);
    }

    #[test]
    fn first_present_skips_blank() {
        let got = first_present([None, Some("  ".to_string()), Some("Ann".to_string())]);
        assert_eq!(got.as_deref(), Some("Ann"));
    }

    #[test]
    fn explicit_only_true_literals() {
        assert_eq!(normalize_explicit(&json!("true")), "true");
        assert_eq!(normalize_explicit(&json!(true)), "true");
        assert_eq!(normalize_explicit(&json!("false")), "false");
        assert_eq!(normalize_explicit(&json!("no")), "false");
        assert_eq!(normalize_explicit(&json!(0)), "false");
        assert_eq!(normalize_explicit(&json!("TRUE")), "false");
        assert_eq!(normalize_explicit(&json!("yes")), "false");
    }

    #[test]
    fn coerce_int_cases() {
        assert_eq!(coerce_int(&json!(3)), Some(3));
        assert_eq!(coerce_int(&json!("12")), Some(12));
        assert_eq!(coerce_int(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_int(&json!("4b")), Some(4));
        assert_eq!(coerce_int(&json!(2.9)), Some(2));
        assert_eq!(coerce_int(&json!(0)), None);
        assert_eq!(coerce_int(&json!("0")), None);
        assert_eq!(coerce_int(&json!("")), None);
        assert_eq!(coerce_int(&json!("abc")), None);
        assert_eq!(coerce_int(&json!(null)), None);
    }

    #[test]
    fn category_split_and_lists() {
        assert_eq!(
            Category::parse("Technology > Podcasting"),
            Category {
                text: "Technology".into(),
                child: Some("Podcasting".into())
            }
        );

        let cats = categories(&json!(["Arts", "Society & Culture > History"]));
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].child, None);
        assert_eq!(cats[1].text, "Society & Culture");
        assert_eq!(cats[1].child.as_deref(), Some("History"));

        assert!(categories(&json!(null)).is_empty());
    }

    #[test]
    fn blank_categories_are_dropped() {
        assert!(categories(&json!("")).is_empty());
        assert!(categories(&json!("   ")).is_empty());

        let cats = categories(&json!(["", "Arts", " ", " > Orphan"]));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].text, "Arts");
    }
}
