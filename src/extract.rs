use crate::alias;
use crate::config::{CHARACTERS_PAGE, COLLECTION_PAGE, PROGRESS_INTERVAL};
use crate::content;
use crate::index::NameIndex;
use crate::infobox;
use crate::listtree;
use crate::models::{
    CharacterRecord, EntityId, EntityKind, ItemRecord, ListForest, TrinketRecord,
};
use crate::parser::{WikiPage, WikiReader};
use crate::relations::{self, Extraction};
use crate::stats::ExtractionStats;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, error, info, warn};

const ITEM_HEADERS: [&str; 9] = [
    "name",
    "id",
    "quote",
    "description",
    "quality",
    "unlock",
    "dlc",
    "effects",
    "notes",
];
const TRINKET_HEADERS: [&str; 10] = [
    "name",
    "id",
    "pool",
    "quote",
    "description",
    "tags",
    "unlock",
    "dlc",
    "effects",
    "notes",
];
const CHARACTER_HEADERS: [&str; 2] = ["name", "id"];
const RELATIONSHIP_HEADERS: [&str; 3] = ["source", "destination", "description"];

pub struct ExtractOptions {
    pub input: String,
    pub output_dir: String,
    /// Newline-separated list of trinket page titles; trinkets are skipped
    /// when absent.
    pub trinkets_path: Option<String>,
    pub write_json: bool,
    pub dry_run: bool,
}

/// Runs the full pipeline: scan the dump, ingest items, trinkets, and
/// characters (building the name index as ids are discovered), then mine
/// the synergy/interaction sections for relationships and write the output
/// tables. Per-entity markup failures are logged and counted, never fatal.
pub fn run_extraction(opts: &ExtractOptions) -> Result<ExtractionStats> {
    let mut stats = ExtractionStats::new();
    let pages = scan_pages(&opts.input, &mut stats)?;

    let item_keys = {
        let collection = find_page(&pages, COLLECTION_PAGE)?;
        key_set(content::item_names(&collection.text))
    };
    let character_keys = {
        let characters = find_page(&pages, CHARACTERS_PAGE)?;
        key_set(content::character_names(&characters.text))
    };
    let trinket_keys = key_set(load_trinket_names(opts.trinkets_path.as_deref())?);

    let mut index = NameIndex::new();
    let mut items: Vec<ItemRecord> = Vec::new();
    let mut trinkets: Vec<TrinketRecord> = Vec::new();
    let mut characters: Vec<CharacterRecord> = Vec::new();
    // ordered per-entity section forests for the relationship pass
    let mut synergies: Vec<(String, Option<ListForest>)> = Vec::new();
    let mut interactions: Vec<(String, Option<ListForest>)> = Vec::new();

    for page in &pages {
        let key = alias::canonical_key(&page.title);
        if !item_keys.contains(key.as_str()) {
            continue;
        }
        let Some(num) = infobox::id(&page.text) else {
            debug!(title = %page.title, "item page has no infobox id, skipping");
            continue;
        };
        let id = EntityId::new(EntityKind::Item, num);
        items.push(ItemRecord {
            name: page.title.clone(),
            id,
            quote: infobox::quote(&page.text),
            description: infobox::description(&page.text),
            quality: infobox::quality(&page.text),
            unlock: infobox::unlock(&page.text),
            dlc: infobox::dlc(&page.text),
            effects: rendered_section(
                &page.title,
                "effects",
                content::effects_section(&page.text),
                &mut stats,
            ),
            notes: rendered_section(
                &page.title,
                "notes",
                content::notes_section(&page.text),
                &mut stats,
            ),
        });
        index.insert(key, id);
        synergies.push((
            page.title.clone(),
            parsed_section(
                &page.title,
                "synergies",
                content::synergies_section(&page.text),
                &mut stats,
            ),
        ));
        interactions.push((
            page.title.clone(),
            parsed_section(
                &page.title,
                "interactions",
                content::interactions_section(&page.text),
                &mut stats,
            ),
        ));
        stats.items += 1;
    }
    info!(items = stats.items, "Items ingested");

    for page in &pages {
        let key = alias::canonical_key(&page.title);
        if !trinket_keys.contains(key.as_str()) {
            continue;
        }
        let Some(num) = infobox::id(&page.text) else {
            debug!(title = %page.title, "trinket page has no infobox id, skipping");
            continue;
        };
        let id = EntityId::new(EntityKind::Trinket, num);
        trinkets.push(TrinketRecord {
            name: page.title.clone(),
            id,
            pool: infobox::pool(&page.text),
            quote: infobox::quote(&page.text),
            description: infobox::description(&page.text),
            tags: infobox::tags(&page.text),
            unlock: infobox::unlock(&page.text),
            dlc: infobox::dlc(&page.text),
            effects: rendered_section(
                &page.title,
                "effects",
                content::effects_section(&page.text),
                &mut stats,
            ),
            notes: rendered_section(
                &page.title,
                "notes",
                content::notes_section(&page.text),
                &mut stats,
            ),
        });
        index.insert(key, id);
        synergies.push((
            page.title.clone(),
            parsed_section(
                &page.title,
                "synergies",
                content::synergies_section(&page.text),
                &mut stats,
            ),
        ));
        interactions.push((
            page.title.clone(),
            parsed_section(
                &page.title,
                "interactions",
                content::interactions_section(&page.text),
                &mut stats,
            ),
        ));
        stats.trinkets += 1;
    }
    info!(trinkets = stats.trinkets, "Trinkets ingested");

    for page in &pages {
        let key = alias::canonical_key(&page.title);
        if !character_keys.contains(key.as_str()) {
            continue;
        }
        let Some(num) = infobox::id(&page.text) else {
            debug!(title = %page.title, "character page has no infobox id, skipping");
            continue;
        };
        let id = EntityId::new(EntityKind::Character, num);
        characters.push(CharacterRecord {
            name: page.title.clone(),
            id,
        });
        index.insert(key, id);
        stats.characters += 1;
    }
    info!(characters = stats.characters, "Characters ingested");

    // the index is frozen from here on; extraction only reads it
    let index = index;
    let synergy_records = relations::extract(&synergies, &index, "synergies");
    let interaction_records = relations::extract(&interactions, &index, "interactions");
    report_failures(&synergy_records, &mut stats);
    report_failures(&interaction_records, &mut stats);
    stats.synergies = synergy_records.records.len() as u64;
    stats.interactions = interaction_records.records.len() as u64;

    if opts.dry_run {
        info!("Dry run, skipping output files");
        return Ok(stats);
    }

    fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", opts.output_dir))?;
    write_csv(&opts.output_dir, "items", &ITEM_HEADERS, &items)?;
    write_csv(&opts.output_dir, "trinkets", &TRINKET_HEADERS, &trinkets)?;
    write_csv(&opts.output_dir, "characters", &CHARACTER_HEADERS, &characters)?;
    write_csv(
        &opts.output_dir,
        "synergies",
        &RELATIONSHIP_HEADERS,
        &synergy_records.records,
    )?;
    write_csv(
        &opts.output_dir,
        "interactions",
        &RELATIONSHIP_HEADERS,
        &interaction_records.records,
    )?;
    if opts.write_json {
        write_json(&opts.output_dir, "items", &items)?;
        write_json(&opts.output_dir, "trinkets", &trinkets)?;
        write_json(&opts.output_dir, "characters", &characters)?;
        write_json(&opts.output_dir, "synergies", &synergy_records.records)?;
        write_json(&opts.output_dir, "interactions", &interaction_records.records)?;
    }

    Ok(stats)
}

fn scan_pages(input: &str, stats: &mut ExtractionStats) -> Result<Vec<WikiPage>> {
    info!("Scanning dump: {}", input);
    let reader = WikiReader::new(input)?;
    let pb = ProgressBar::new_spinner();
    let mut pages = Vec::new();
    for page in reader {
        let page = page.with_context(|| format!("Failed to read wiki dump: {}", input))?;
        stats.pages_scanned += 1;
        if stats.pages_scanned % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }
        pages.push(page);
    }
    pb.finish_and_clear();
    info!(pages = pages.len(), "Dump scanned");
    Ok(pages)
}

fn find_page<'a>(pages: &'a [WikiPage], title: &str) -> Result<&'a WikiPage> {
    pages
        .iter()
        .find(|p| p.title == title)
        .with_context(|| format!("Dump has no {:?} page", title))
}

fn load_trinket_names(path: Option<&str>) -> Result<Vec<String>> {
    let Some(path) = path else {
        warn!("no trinket list supplied, skipping trinkets");
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trinket list: {}", path))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

fn key_set(names: Vec<String>) -> FxHashSet<String> {
    names.iter().map(|name| alias::canonical_key(name)).collect()
}

/// Parses one section block, logging and counting a malformed list instead
/// of failing the entity.
fn parsed_section(
    entity: &str,
    field: &str,
    span: Option<&str>,
    stats: &mut ExtractionStats,
) -> Option<ListForest> {
    let span = span?;
    match listtree::parse(span) {
        Ok(forest) => Some(forest),
        Err(err) => {
            error!(entity = entity, field = field, %err, "skipping malformed list section");
            stats.malformed_lists += 1;
            None
        }
    }
}

fn rendered_section(
    entity: &str,
    field: &str,
    span: Option<&str>,
    stats: &mut ExtractionStats,
) -> Option<String> {
    parsed_section(entity, field, span, stats).map(|forest| listtree::format_forest(&forest))
}

fn report_failures(extraction: &Extraction, stats: &mut ExtractionStats) {
    for failure in &extraction.failures {
        error!(%failure, "relationship extraction failure");
        stats.unresolved_references += 1;
    }
}

/// The header row is written up front so empty tables still carry one.
fn write_csv<T: Serialize>(
    output_dir: &str,
    name: &str,
    headers: &[&str],
    rows: &[T],
) -> Result<()> {
    let path = Path::new(output_dir).join(format!("{}.csv", name));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(output_dir: &str, name: &str, rows: &[T]) -> Result<()> {
    let path = Path::new(output_dir).join(format!("{}.json", name));
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, rows)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_set_canonicalizes_names() {
        let keys = key_set(vec!["Sad Onion".to_string(), "Number Two".to_string()]);
        assert!(keys.contains("sad onion"));
        assert!(keys.contains("no. 2"));
    }

    #[test]
    fn load_trinket_names_without_path_is_empty() {
        assert!(load_trinket_names(None).unwrap().is_empty());
    }

    #[test]
    fn load_trinket_names_missing_file_is_an_error() {
        assert!(load_trinket_names(Some("/nonexistent/trinkets.txt")).is_err());
    }

    #[test]
    fn parsed_section_counts_malformed_lists() {
        let mut stats = ExtractionStats::new();
        let forest = parsed_section("Sad Onion", "effects", Some("no bullets here"), &mut stats);
        assert!(forest.is_none());
        assert_eq!(stats.malformed_lists, 1);
    }

    #[test]
    fn parsed_section_absent_span_is_not_malformed() {
        let mut stats = ExtractionStats::new();
        assert!(parsed_section("Sad Onion", "effects", None, &mut stats).is_none());
        assert_eq!(stats.malformed_lists, 0);
    }

    #[test]
    fn rendered_section_formats_markers() {
        let mut stats = ExtractionStats::new();
        let rendered = rendered_section(
            "Sad Onion",
            "effects",
            Some("*Tears up.\n**Stacks."),
            &mut stats,
        );
        assert_eq!(rendered.as_deref(), Some("* Tears up.\n** Stacks."));
    }
}
