//! Platinum: Binding of Isaac wiki dump extraction pipeline
//!
//! This crate turns a MediaWiki XML export of the Binding of Isaac wiki into
//! normalized CSV/JSON tables of items, trinkets, characters, and the
//! relationships between them:
//!
//! 1. **Scan Pass** -- Stream the dump (plain or BZ2) and collect page
//!    titles and raw wikitext bodies
//! 2. **Ingestion Pass** -- Filter pages against the item/trinket/character
//!    title sets, read their infobox fields, assign kind-namespaced entity
//!    ids into the name index, and parse the Effects/Notes/Synergies/
//!    Interactions bullet lists into trees
//! 3. **Relationship Pass** -- With the name index frozen, mine every
//!    synergy/interaction entry for citation templates and resolve them to
//!    (source, destination, description) records
//!
//! # Architecture
//!
//! The markup engine is a set of pure functions over in-memory strings and
//! trees; all I/O lives at the pipeline edges:
//!
//! - **List trees** -- Bullet depth becomes tree nesting; new entries always
//!   attach under the most recently added branch
//! - **Template rendering** -- Recognized inline templates and wikilinks
//!   become display text; unknown markup passes through verbatim
//! - **Name resolution** -- Fuzzy, alias-laden names are normalized to
//!   canonical keys before hitting the name index, so every spelling of an
//!   entity lands on the same id
//! - **Failure isolation** -- A malformed list or unresolved reference
//!   aborts only the entity/entry it occurs in, with context logged
//!
//! # Key Modules
//!
//! - [`parser`] -- Streaming XML page reader with optional BZ2 decompression
//! - [`content`] -- Section span isolation and title-list discovery
//! - [`infobox`] -- Fixed-key infobox field lookups
//! - [`listtree`] -- Bullet-list parser and display formatter
//! - [`template`] -- Inline template/wikilink rendering and citation extraction
//! - [`alias`] -- Canonical keys, rename table, exclusion list
//! - [`index`] -- Write-once name-to-id index
//! - [`relations`] -- Relationship record extraction
//! - [`extract`] -- Pipeline orchestration and CSV/JSON output
//! - [`models`] -- Core data types (ListNode, EntityId, record structs)
//! - [`error`] -- Markup error taxonomy
//! - [`stats`] -- Extraction counters
//! - [`config`] -- Well-known page titles and intervals
//!
//! # Example Usage
//!
//! ```bash
//! # Extract a dump into CSV tables plus JSON siblings
//! platinum extract -i isaac-wiki.xml -o output/ --trinkets trinkets.txt --json
//!
//! # Validate a dump without writing anything
//! platinum -v extract -i isaac-wiki.xml.bz2 -o output/ --dry-run
//! ```

pub mod alias;
pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod index;
pub mod infobox;
pub mod listtree;
pub mod models;
pub mod parser;
pub mod relations;
pub mod stats;
pub mod template;
