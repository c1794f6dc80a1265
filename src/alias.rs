use crate::models::EntityRef;
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Canonical lookup key: lowercase, trimmed entity name, with known
/// inconsistent spellings re-pointed to the canonical page name.
pub type CanonicalKey = String;

/// Known inconsistent wiki spellings. Versioned configuration data
/// reflecting specific wiki content quirks; extend it when a new
/// unresolved-reference error names a spelling variant, do not rederive.
const RENAMES: &[(&str, &str)] = &[
    // numeral/word variant of the item name
    ("number two", "no. 2"),
    // truncated capture of the "Money = Power" item (the `=` splits the template argument)
    ("money {{=", "money = power"),
    // compound character name spelled out with "and" instead of the ampersand
    ("jacob and esau", "jacob & esau"),
    // the placeholder character shares its three-question-mark name with an item page
    ("???", "??? (character)"),
    // flip-side forms that resolve to a different canonical entity
    ("tainted soul", "tainted forgotten"),
    ("dead tainted lazarus", "tainted lazarus"),
];

/// Malformed/legacy reference names dropped entirely, never resolved.
const EXCLUSIONS: &[&str] = &["broken shovel 1", "broken shovel 2"];

static RENAME_TABLE: Lazy<FxHashMap<&'static str, &'static str>> =
    Lazy::new(|| RENAMES.iter().copied().collect());

static EXCLUSION_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| EXCLUSIONS.iter().copied().collect());

/// Normalizes a reference to its lookup key. Total over all strings:
/// unknown names fall through to plain lowercase + trim.
pub fn canonicalize(reference: &EntityRef) -> CanonicalKey {
    canonical_key(&reference.raw_name)
}

/// The same normalization, applied to page titles when the name index is
/// built so that reference keys and index keys always agree.
pub fn canonical_key(name: &str) -> CanonicalKey {
    let key = name.trim().to_lowercase();
    match RENAME_TABLE.get(key.as_str()) {
        Some(target) => (*target).to_string(),
        None => key,
    }
}

/// Whether the reference must be treated as "no reference" by the caller,
/// as opposed to a lookup miss.
pub fn is_excluded(reference: &EntityRef) -> bool {
    EXCLUSION_SET.contains(reference.raw_name.trim().to_lowercase().as_str())
}
