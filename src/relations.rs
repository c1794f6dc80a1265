use crate::alias;
use crate::error::MarkupError;
use crate::index::NameIndex;
use crate::listtree;
use crate::models::{ListForest, RelationshipRecord};
use crate::template;
use tracing::debug;

/// Result of mining one section map: the resolved records plus the
/// per-entry failures that were skipped over. A failure never aborts the
/// batch; it carries the context needed to grow the alias tables.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<RelationshipRecord>,
    pub failures: Vec<MarkupError>,
}

/// Walks an ordered (entity name, section forest) mapping and emits one
/// relationship record per resolved citation found in each top-level
/// entry's leading text. Absent forests are skipped; a section may
/// legitimately not exist. Record order follows map order, then forest
/// order, then occurrence order within the entry.
pub fn extract(
    sections: &[(String, Option<ListForest>)],
    index: &NameIndex,
    field: &str,
) -> Extraction {
    let mut out = Extraction::default();

    for (entity, forest) in sections {
        let Some(forest) = forest else { continue };

        let Some(source) = index.resolve(&alias::canonical_key(entity)) else {
            out.failures
                .push(MarkupError::unknown_reference(entity, entity, field, ""));
            continue;
        };

        for entry in forest {
            let span = entry.leading_text();
            // the description is only rendered once a citation actually resolves
            let mut description: Option<String> = None;

            for reference in template::extract_references(span) {
                if alias::is_excluded(&reference) {
                    debug!(name = %reference.raw_name, entity = %entity, "excluded reference dropped");
                    continue;
                }
                let key = alias::canonicalize(&reference);
                match index.resolve(&key) {
                    Some(destination) => {
                        let description = description
                            .get_or_insert_with(|| listtree::format_entry(entry))
                            .clone();
                        out.records.push(RelationshipRecord {
                            source,
                            destination,
                            description,
                        });
                    }
                    None => {
                        out.failures.push(MarkupError::unknown_reference(
                            &reference.raw_name,
                            entity,
                            field,
                            span,
                        ));
                        // abort this entry, keep going with the rest of the forest
                        break;
                    }
                }
            }
        }
    }

    out
}
