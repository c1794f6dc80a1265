use once_cell::sync::Lazy;
use regex::Regex;

// Fixed-key line lookups over the page's infobox template. The wiki pads
// keys with whitespace to align the `=` signs, hence the `\s+`.
static ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| id\s+= ([0-9]+)").unwrap());
static QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| quote\s+= (.*)").unwrap());
static DESCRIPTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\| description\s+= (.*)").unwrap());
static QUALITY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| quality\s+= ([0-9])").unwrap());
static UNLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| unlocked by\s+= (.*)").unwrap());
static POOL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| pool\s+= (.*)").unwrap());
static TAGS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| tags\s+= (.*)").unwrap());
static DLC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\| dlc\s+= (.*)").unwrap());

/// Numeric infobox id. Pages without one are not ingestible entities.
pub fn id(text: &str) -> Option<u32> {
    field(text, &ID_REGEX).and_then(|s| s.parse().ok())
}

pub fn quote(text: &str) -> Option<String> {
    field(text, &QUOTE_REGEX)
}

pub fn description(text: &str) -> Option<String> {
    field(text, &DESCRIPTION_REGEX)
}

pub fn quality(text: &str) -> Option<String> {
    field(text, &QUALITY_REGEX)
}

pub fn unlock(text: &str) -> Option<String> {
    field(text, &UNLOCK_REGEX)
}

pub fn pool(text: &str) -> Option<String> {
    field(text, &POOL_REGEX)
}

pub fn tags(text: &str) -> Option<String> {
    field(text, &TAGS_REGEX)
}

pub fn dlc(text: &str) -> Option<String> {
    field(text, &DLC_REGEX)
}

fn field(text: &str, regex: &Regex) -> Option<String> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
