use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

static EFFECTS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)==\s?Effects?\s?==\n+(.*?)(?:\n\n==|\z)").unwrap());

static NOTES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)==\s?Notes\s?==\n+(.*?)(?:\n\n==|\z)").unwrap());

static SYNERGIES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)==\s?Synergies\s?==\n+(.*?)(?:\n\n==|\z)").unwrap());

static INTERACTIONS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)==\s?Interactions\s?==\n+(.*?)(?:\n\n==|\z)").unwrap());

static COLLECTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)content =(.*?)\}\}").unwrap());

static CHARACTER_TEMPLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{c\|(.*?)\}\}").unwrap());

/// Raw markup of the `== Effects ==` section, when the page has one.
pub fn effects_section(text: &str) -> Option<&str> {
    section(text, &EFFECTS_REGEX)
}

pub fn notes_section(text: &str) -> Option<&str> {
    section(text, &NOTES_REGEX)
}

pub fn synergies_section(text: &str) -> Option<&str> {
    section(text, &SYNERGIES_REGEX)
}

pub fn interactions_section(text: &str) -> Option<&str> {
    section(text, &INTERACTIONS_REGEX)
}

fn section<'a>(text: &'a str, regex: &Regex) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Item titles listed in the collection page's `content = ...` template
/// argument, comma-separated. The wiki lists one item under a spelled-out
/// name that every other page cites numerically, repaired here.
pub fn item_names(collection_text: &str) -> Vec<String> {
    let Some(content) = COLLECTION_REGEX
        .captures(collection_text)
        .and_then(|c| c.get(1))
    else {
        return Vec::new();
    };
    content
        .as_str()
        .replace('\n', "")
        .replace("Number Two", "No. 2")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Character names cited on the characters page, in first-appearance order
/// with duplicates dropped.
pub fn character_names(characters_text: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    CHARACTER_TEMPLATE
        .captures_iter(characters_text)
        .map(|c| c.get(1).map_or("", |m| m.as_str()).trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}
