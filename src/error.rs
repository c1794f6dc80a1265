use thiserror::Error;

/// Errors raised by the markup interpretation core.
///
/// Both variants abort the entity or entry they occur in, never the whole
/// batch. They carry enough context to extend the alias tables or diagnose
/// the offending page by hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Bullet structure violates the depth-continuity assumption.
    #[error("malformed bullet list: {reason} (near: {span:?})")]
    MalformedList { reason: String, span: String },

    /// A non-excluded reference resolved to a key absent from the name index.
    /// Signals either a missing alias-table entry or an ingestion gap.
    #[error("unresolved reference {name:?} in {field} of {entity:?} (near: {span:?})")]
    UnknownReference {
        name: String,
        entity: String,
        field: String,
        span: String,
    },
}

impl MarkupError {
    pub fn malformed(reason: impl Into<String>, span: &str) -> Self {
        MarkupError::MalformedList {
            reason: reason.into(),
            span: clip(span),
        }
    }

    pub fn unknown_reference(
        name: impl Into<String>,
        entity: impl Into<String>,
        field: impl Into<String>,
        span: &str,
    ) -> Self {
        MarkupError::UnknownReference {
            name: name.into(),
            entity: entity.into(),
            field: field.into(),
            span: clip(span),
        }
    }
}

/// Error context keeps a short prefix of the raw span, not the full block.
fn clip(span: &str) -> String {
    const MAX: usize = 80;
    if span.len() <= MAX {
        span.to_string()
    } else {
        let mut end = MAX;
        while !span.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &span[..end])
    }
}
