use crate::models::EntityRef;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::Mutex;
use tracing::warn;

/// Tags whose first positional argument is their display text: entity,
/// effect, character, tag, range, speed, pickup, attack, mechanic.
const INLINE_TAGS: &[&str] = &["i", "e", "c", "t", "r", "s", "p", "a", "m"];

/// Availability codes used by `{{dlc|..}}`, covering the added/removed
/// combinations across the three expansions. Hand-maintained; matches the
/// codes observed on the wiki.
const DLC_PHRASES: &[(&str, &str)] = &[
    ("a", "Added in Afterbirth"),
    ("a+", "Added in Afterbirth †"),
    ("r", "Added in Repentance"),
    ("na", "Removed in Afterbirth"),
    ("na+", "Removed in Afterbirth †"),
    ("nr", "Removed in Repentance"),
    ("ana+", "Added in Afterbirth, removed in Afterbirth †"),
    ("anr", "Added in Afterbirth, removed in Repentance"),
    ("a+nr", "Added in Afterbirth †, removed in Repentance"),
    (
        "ana+r",
        "Added in Afterbirth, removed in Afterbirth †, re-added in Repentance",
    ),
];

/// Citation templates mined for cross-references. Kept to an explicit
/// allow-list of the three reference tags; formatting templates that merely
/// look like citations must not match. Tolerates an explicit `1=` argument
/// marker and a trailing display-override argument. The lazy first-argument
/// capture stops at the first close brace, which reproduces the truncated
/// names the alias table repairs.
static REF_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{\{(?:i|c|t)\|(?:1=)?([^|}]+?)(?:\|([^}]*?))?\}\}").unwrap()
});

static WARNED_TAGS: Lazy<Mutex<FxHashSet<String>>> =
    Lazy::new(|| Mutex::new(FxHashSet::default()));

/// Rewrites every recognized template and wikilink in `span` to display
/// text. Unrecognized markup passes through verbatim; this never fails.
pub fn render(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let bytes = span.as_bytes();
    let mut i = 0;
    let mut run_start = 0;

    while i < bytes.len() {
        if i + 1 < bytes.len() && bytes[i] == b'{' && bytes[i + 1] == b'{' {
            out.push_str(&span[run_start..i]);
            match find_matching_close(bytes, i) {
                Some(close) => {
                    out.push_str(&render_template(&span[i + 2..close], &span[i..close + 2]));
                    i = close + 2;
                }
                None => {
                    // unterminated template, pass the remainder through
                    out.push_str(&span[i..]);
                    i = bytes.len();
                }
            }
            run_start = i;
        } else if i + 1 < bytes.len() && bytes[i] == b'[' && bytes[i + 1] == b'[' {
            out.push_str(&span[run_start..i]);
            match find_link_close(bytes, i + 2) {
                Some(close) => {
                    out.push_str(&render(link_display(&span[i + 2..close])));
                    i = close + 2;
                }
                None => {
                    out.push_str(&span[i..]);
                    i = bytes.len();
                }
            }
            run_start = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&span[run_start..]);
    out
}

/// Extracts every entity/character/trinket citation from `span` without
/// altering it. Returns the first positional argument of each match as the
/// raw name, in occurrence order.
pub fn extract_references(span: &str) -> Vec<EntityRef> {
    REF_TEMPLATE
        .captures_iter(span)
        .map(|caps| EntityRef {
            raw_name: caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
            raw_suffix: caps.get(2).map(|m| m.as_str().trim().to_string()),
        })
        .collect()
}

fn render_template(inner: &str, raw: &str) -> String {
    let segments = split_at_depth_zero(inner);
    let tag = segments[0].trim().to_ascii_lowercase();

    if tag == "dlc" {
        let code = segments
            .get(1)
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_default();
        return match DLC_PHRASES.iter().find(|(c, _)| *c == code) {
            Some((_, phrase)) => format!("({})", phrase),
            None => {
                warn_once(&format!("dlc|{}", code));
                format!("(DLC {})", code)
            }
        };
    }

    if INLINE_TAGS.contains(&tag.as_str()) {
        let first = segments.get(1).map_or("", |s| s.trim());
        let first = first.strip_prefix("1=").unwrap_or(first);
        return render(first);
    }

    warn_once(&tag);
    raw.to_string()
}

fn warn_once(tag: &str) {
    if let Ok(mut warned) = WARNED_TAGS.lock() {
        if warned.insert(tag.to_string()) {
            warn!(tag = tag, "unrecognized template, passing through verbatim");
        }
    }
}

/// Index of the `}}` closing the `{{` at `start`, honoring nesting.
fn find_matching_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut i = start;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'}' && bytes[i + 1] == b'}' {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

fn find_link_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < bytes.len() {
        if bytes[i] == b']' && bytes[i + 1] == b']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// `[[X]]` shows `X`; `[[X|Y]]` shows the display override `Y`.
fn link_display(inner: &str) -> &str {
    match inner.rsplit_once('|') {
        Some((_, display)) if !display.trim().is_empty() => display.trim(),
        _ => inner.trim(),
    }
}

/// Splits on `|` at brace depth 0, respecting nested `{{ }}`.
fn split_at_depth_zero(content: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let bytes = content.as_bytes();
    let mut depth: i32 = 0;
    let mut last_split = 0;
    let mut i = 0;

    while i < bytes.len() {
        if i + 1 < bytes.len() && bytes[i] == b'{' && bytes[i + 1] == b'{' {
            depth += 1;
            i += 2;
        } else if i + 1 < bytes.len() && bytes[i] == b'}' && bytes[i + 1] == b'}' {
            depth -= 1;
            i += 2;
        } else if bytes[i] == b'|' && depth == 0 {
            segments.push(&content[last_split..i]);
            last_split = i + 1;
            i += 1;
        } else {
            i += 1;
        }
    }
    segments.push(&content[last_split..]);
    segments
}
