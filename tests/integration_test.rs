//! End-to-end tests for the Platinum wiki extraction pipeline.
//!
//! The complete data flow is exercised from XML input through to CSV and
//! JSON output. Tests are organized into logical sections:
//!
//! - **Pipeline Tests** -- record counts, CSV shapes, dry-run behavior
//! - **Resolution Tests** -- alias repair, exclusions, cross-kind references
//! - **Failure Tests** -- malformed lists and unresolved references stay
//!   contained to the entity they occur in
//!
//! # Test Strategy
//!
//! Most tests share a `sample_xml()` fixture: a minimal dump carrying the
//! collection page, the characters page, four items, one trinket, and two
//! characters, with enough section markup to produce one synergy record and
//! two interaction records. Failure tests build their own smaller dumps.

use platinum::extract::{run_extraction, ExtractOptions};
use std::io::Write;
use tempfile::{Builder, NamedTempFile, TempDir};

/// Helper: write a plain XML dump to a temp file and return the handle.
fn write_dump(xml: &str) -> NamedTempFile {
    let mut tmp = Builder::new().suffix(".xml").tempfile().unwrap();
    tmp.write_all(xml.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn write_trinket_list() -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "Cancer").unwrap();
    tmp.flush().unwrap();
    tmp
}

fn page(title: &str, text: &str) -> String {
    format!(
        "<page><title>{}</title><revision><text>{}</text></revision></page>",
        title, text
    )
}

/// Minimal dump: collection and characters pages for name discovery, plus
/// item, trinket, and character pages with infoboxes and section markup.
fn sample_xml() -> String {
    let collection = page(
        "Collection Page (Repentance)",
        "{{collection page\n| content = Sad Onion, Spoon Bender,\nMega Mush, Number Two}}",
    );
    let characters = page("Characters", "{{c|Isaac}} and {{c|???}} and {{c|Isaac}}");
    let sad_onion = page(
        "Sad Onion",
        "{{infobox item\n\
         | id          = 1\n\
         | quote       = Tears up\n\
         | description = Tears up\n\
         | quality     = 1\n\
         | unlocked by = nothing\n\
         }}\n\n\
         == Effects ==\n*+0.7 tears.\n\n\
         == Trivia ==\nAn onion.",
    );
    let spoon_bender = page(
        "Spoon Bender",
        "{{infobox item\n\
         | id          = 3\n\
         | quote       = Psychic shots\n\
         | description = Grants homing tears\n\
         | quality     = 1\n\
         | dlc         = a\n\
         }}\n\n\
         == Effects ==\n*Grants [[homing tears]].\n\n\
         == Notes ==\n*Tears curve toward enemies.\n**Includes familiar tears.\n\n\
         == Synergies ==\n*{{i|1=Mega Mush}}: giant homing tears.\n\n\
         == Interactions ==\n\
         *{{i|Number Two}}: nothing special.\n\
         *{{t|Cancer}}: lowered charge.\n\
         *{{i|Broken Shovel 1}}: ignored piece.",
    );
    let mega_mush = page(
        "Mega Mush",
        "{{infobox item\n| id = 625\n| quality = 4\n}}\n\n\
         == Effects ==\n*Giant Isaac for 30 seconds.",
    );
    let number_two = page(
        "No. 2",
        "{{infobox item\n| id = 378\n}}\n\n== Effects ==\n*Leaves a poop trail.",
    );
    let cancer = page(
        "Cancer",
        "{{infobox trinket\n\
         | id   = 39\n\
         | pool = normal\n\
         | tags = health\n\
         }}\n\n\
         == Effects ==\n*-2 charge on activated items.",
    );
    let isaac = page("Isaac", "{{infobox character\n| id = 1\n}}");
    let blue_baby = page("??? (Character)", "{{infobox character\n| id = 4\n}}");
    let unrelated = page("Blue Womb", "Just a floor page with no infobox.");

    format!(
        "<mediawiki>{}{}{}{}{}{}{}{}{}{}</mediawiki>",
        collection,
        characters,
        sad_onion,
        spoon_bender,
        mega_mush,
        number_two,
        cancer,
        isaac,
        blue_baby,
        unrelated
    )
}

fn run_sample(write_json: bool, dry_run: bool) -> (TempDir, platinum::stats::ExtractionStats) {
    let dump = write_dump(&sample_xml());
    let trinkets = write_trinket_list();
    let output = TempDir::new().unwrap();
    let stats = run_extraction(&ExtractOptions {
        input: dump.path().to_str().unwrap().to_string(),
        output_dir: output.path().to_str().unwrap().to_string(),
        trinkets_path: Some(trinkets.path().to_str().unwrap().to_string()),
        write_json,
        dry_run,
    })
    .unwrap();
    (output, stats)
}

fn read_csv(dir: &TempDir, name: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let path = dir.path().join(format!("{}.csv", name));
    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

// ---------------------------------------------------------------------------
// Pipeline tests
// ---------------------------------------------------------------------------

#[test]
fn pipeline_counts_every_entity_kind() {
    let (_output, stats) = run_sample(false, true);
    assert_eq!(stats.pages_scanned, 10);
    assert_eq!(stats.items, 4);
    assert_eq!(stats.trinkets, 1);
    assert_eq!(stats.characters, 2);
    assert_eq!(stats.synergies, 1);
    assert_eq!(stats.interactions, 2);
    assert_eq!(stats.malformed_lists, 0);
    assert_eq!(stats.unresolved_references, 0);
}

#[test]
fn items_csv_has_expected_shape() {
    let (output, _stats) = run_sample(false, false);
    let (headers, rows) = read_csv(&output, "items");
    assert_eq!(
        headers,
        vec![
            "name",
            "id",
            "quote",
            "description",
            "quality",
            "unlock",
            "dlc",
            "effects",
            "notes"
        ]
    );
    assert_eq!(rows.len(), 4);

    let sad_onion = rows.iter().find(|r| r[0] == "Sad Onion").unwrap();
    assert_eq!(sad_onion[1], "item-1");
    assert_eq!(sad_onion[2], "Tears up");
    assert_eq!(sad_onion[7], "* +0.7 tears.");
    // no Notes section on the page
    assert_eq!(sad_onion[8], "");
}

#[test]
fn rendered_sections_resolve_markup() {
    let (output, _stats) = run_sample(false, false);
    let (_, rows) = read_csv(&output, "items");
    let spoon_bender = rows.iter().find(|r| r[0] == "Spoon Bender").unwrap();
    // wikilink rendered, nesting markers restated
    assert_eq!(spoon_bender[7], "* Grants homing tears.");
    assert_eq!(
        spoon_bender[8],
        "* Tears curve toward enemies.\n** Includes familiar tears."
    );
}

#[test]
fn trinkets_csv_uses_trinket_namespace() {
    let (output, _stats) = run_sample(false, false);
    let (headers, rows) = read_csv(&output, "trinkets");
    assert_eq!(headers[0], "name");
    assert_eq!(headers[1], "id");
    assert_eq!(headers[2], "pool");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Cancer");
    assert_eq!(rows[0][1], "trinket-39");
    assert_eq!(rows[0][2], "normal");
}

#[test]
fn characters_csv_lists_discovered_characters() {
    let (output, _stats) = run_sample(false, false);
    let (headers, rows) = read_csv(&output, "characters");
    assert_eq!(headers, vec!["name", "id"]);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r[0] == "Isaac" && r[1] == "character-1"));
    assert!(rows
        .iter()
        .any(|r| r[0] == "??? (Character)" && r[1] == "character-4"));
}

#[test]
fn synergies_csv_pairs_source_and_destination() {
    let (output, _stats) = run_sample(false, false);
    let (headers, rows) = read_csv(&output, "synergies");
    assert_eq!(headers, vec!["source", "destination", "description"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "item-3");
    assert_eq!(rows[0][1], "item-625");
    assert_eq!(rows[0][2], "* Mega Mush: giant homing tears.");
}

#[test]
fn dry_run_writes_no_files() {
    let (output, stats) = run_sample(false, true);
    assert_eq!(stats.items, 4);
    assert!(!output.path().join("items.csv").exists());
    assert!(!output.path().join("synergies.csv").exists());
}

#[test]
fn json_flag_writes_parseable_siblings() {
    let (output, _stats) = run_sample(true, false);
    for name in ["items", "trinkets", "characters", "synergies", "interactions"] {
        let path = output.path().join(format!("{}.json", name));
        assert!(path.exists(), "missing {}", path.display());
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
    }

    let raw = std::fs::read_to_string(output.path().join("synergies.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["source"], "item-3");
    assert_eq!(value[0]["destination"], "item-625");
}

#[test]
fn missing_collection_page_is_an_error() {
    let dump = write_dump("<mediawiki><page><title>Lonely</title><revision><text>hi</text></revision></page></mediawiki>");
    let output = TempDir::new().unwrap();
    let result = run_extraction(&ExtractOptions {
        input: dump.path().to_str().unwrap().to_string(),
        output_dir: output.path().to_str().unwrap().to_string(),
        trinkets_path: None,
        write_json: false,
        dry_run: true,
    });
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Resolution tests
// ---------------------------------------------------------------------------

#[test]
fn interactions_resolve_aliases_and_cross_kinds() {
    let (output, _stats) = run_sample(false, false);
    let (_, rows) = read_csv(&output, "interactions");
    assert_eq!(rows.len(), 2);
    // {{i|Number Two}} resolves through the rename table to the No. 2 item
    assert_eq!(rows[0][0], "item-3");
    assert_eq!(rows[0][1], "item-378");
    // {{t|Cancer}} resolves to the trinket, not an item
    assert_eq!(rows[1][0], "item-3");
    assert_eq!(rows[1][1], "trinket-39");
}

#[test]
fn excluded_references_never_become_records() {
    let (output, stats) = run_sample(false, false);
    let (_, rows) = read_csv(&output, "interactions");
    // Broken Shovel 1 appears in the fixture markup but produces nothing
    assert!(rows.iter().all(|r| !r[2].contains("ignored piece")));
    assert_eq!(stats.unresolved_references, 0);
}

#[test]
fn collection_spelling_repair_reaches_the_item() {
    let (output, _stats) = run_sample(false, false);
    let (_, rows) = read_csv(&output, "items");
    // the collection page says "Number Two"; the page itself is "No. 2"
    let number_two = rows.iter().find(|r| r[0] == "No. 2").unwrap();
    assert_eq!(number_two[1], "item-378");
}

#[test]
fn pages_without_infobox_ids_are_skipped() {
    let (output, stats) = run_sample(false, false);
    // "Blue Womb" has no infobox and is in no name list
    let (_, rows) = read_csv(&output, "items");
    assert!(rows.iter().all(|r| r[0] != "Blue Womb"));
    assert_eq!(stats.items, 4);
}

// ---------------------------------------------------------------------------
// Failure containment tests
// ---------------------------------------------------------------------------

#[test]
fn unresolved_reference_is_counted_not_fatal() {
    let collection = page(
        "Collection Page (Repentance)",
        "{{collection page\n| content = Lost Contact, The Wiz}}",
    );
    let characters = page("Characters", "{{c|Isaac}}");
    let isaac = page("Isaac", "{{infobox character\n| id = 1\n}}");
    let lost_contact = page(
        "Lost Contact",
        "{{infobox item\n| id = 213\n}}\n\n\
         == Synergies ==\n\
         *{{i|Missing Item}}: never ingested.\n\
         *{{i|The Wiz}}: still resolves.",
    );
    let the_wiz = page(
        "The Wiz",
        "{{infobox item\n| id = 358\n}}\n\n== Effects ==\n*Double wavy shots.",
    );
    let dump = write_dump(&format!(
        "<mediawiki>{}{}{}{}{}</mediawiki>",
        collection, characters, isaac, lost_contact, the_wiz
    ));
    let output = TempDir::new().unwrap();

    let stats = run_extraction(&ExtractOptions {
        input: dump.path().to_str().unwrap().to_string(),
        output_dir: output.path().to_str().unwrap().to_string(),
        trinkets_path: None,
        write_json: false,
        dry_run: false,
    })
    .unwrap();

    assert_eq!(stats.unresolved_references, 1);
    // the second entry of the same forest still produced a record
    assert_eq!(stats.synergies, 1);
    let (_, rows) = read_csv(&output, "synergies");
    assert_eq!(rows[0][1], "item-358");
}

#[test]
fn malformed_list_is_counted_and_section_dropped() {
    let collection = page(
        "Collection Page (Repentance)",
        "{{collection page\n| content = Odd Mushroom}}",
    );
    let characters = page("Characters", "{{c|Isaac}}");
    let isaac = page("Isaac", "{{infobox character\n| id = 1\n}}");
    let odd_mushroom = page(
        "Odd Mushroom",
        "{{infobox item\n| id = 120\n}}\n\n\
         == Effects ==\n*Fine entry.\n***Depth jumps two levels.\n\n\
         == Notes ==\n*This list is fine.",
    );
    let dump = write_dump(&format!(
        "<mediawiki>{}{}{}{}</mediawiki>",
        collection, characters, isaac, odd_mushroom
    ));
    let output = TempDir::new().unwrap();

    let stats = run_extraction(&ExtractOptions {
        input: dump.path().to_str().unwrap().to_string(),
        output_dir: output.path().to_str().unwrap().to_string(),
        trinkets_path: None,
        write_json: false,
        dry_run: false,
    })
    .unwrap();

    assert_eq!(stats.malformed_lists, 1);
    assert_eq!(stats.items, 1);
    let (_, rows) = read_csv(&output, "items");
    // effects column dropped, notes column survived
    assert_eq!(rows[0][7], "");
    assert_eq!(rows[0][8], "* This list is fine.");
}
