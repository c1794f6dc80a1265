/// Page whose collection template lists every item title
pub const COLLECTION_PAGE: &str = "Collection Page (Repentance)";

/// Page whose character templates list every playable character
pub const CHARACTERS_PAGE: &str = "Characters";

/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: u64 = 1000;
