use crate::error::MarkupError;
use crate::models::{ListForest, ListNode};
use crate::template;
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

/// Parses a block of bullet-list markup into an ordered forest.
///
/// Each line starts with a run of `*` markers whose length is the entry's
/// depth. New entries always attach under the most recently added branch, so
/// the parser only ever descends through the last child at each level. Text
/// before the first marker is ignored.
///
/// A depth that increases by more than one level in a single step has no
/// well-defined parent and is rejected rather than guessed at.
pub fn parse(block: &str) -> Result<ListForest, MarkupError> {
    let markers: Vec<_> = BULLET_RUN.find_iter(block).collect();
    if markers.is_empty() {
        return Err(MarkupError::malformed("no bullet entries", block));
    }

    let mut forest: ListForest = Vec::new();
    let mut previous = 0usize;

    for (i, marker) in markers.iter().enumerate() {
        let depth = marker.as_str().len();
        let end = markers.get(i + 1).map_or(block.len(), |next| next.start());
        let text = block[marker.end()..end].trim().to_string();

        if depth == 1 {
            forest.push(ListNode::Leaf(text));
        } else {
            let root = forest.last_mut().ok_or_else(|| {
                MarkupError::malformed(format!("list begins at depth {}", depth), block)
            })?;
            if depth > previous + 1 {
                return Err(MarkupError::malformed(
                    format!("nesting depth jumped from {} to {}", previous, depth),
                    &text,
                ));
            }
            if depth == previous + 1 {
                // first child of the previous entry, which gets demoted to a branch
                let parent = entry_at(root, previous)
                    .ok_or_else(|| MarkupError::malformed("open branch chain is broken", &text))?;
                if let ListNode::Leaf(_) = parent {
                    let own = std::mem::replace(parent, ListNode::Branch(Vec::with_capacity(2)));
                    if let ListNode::Branch(children) = parent {
                        children.push(own);
                    }
                }
                if let ListNode::Branch(children) = parent {
                    children.push(ListNode::Leaf(text));
                }
            } else {
                // sibling at a depth that already exists under the current root
                let parent = entry_at(root, depth - 1).ok_or_else(|| {
                    MarkupError::malformed(
                        format!("no open entry at depth {}", depth - 1),
                        &text,
                    )
                })?;
                match parent {
                    ListNode::Branch(children) => children.push(ListNode::Leaf(text)),
                    ListNode::Leaf(_) => {
                        return Err(MarkupError::malformed(
                            format!("no open branch at depth {}", depth - 1),
                            &text,
                        ))
                    }
                }
            }
        }
        previous = depth;
    }

    Ok(forest)
}

/// Descends from the root entry to the last entry at `depth`, taking the
/// last child at every level.
fn entry_at(mut node: &mut ListNode, depth: usize) -> Option<&mut ListNode> {
    for _ in 1..depth {
        match node {
            ListNode::Branch(children) => node = children.last_mut()?,
            ListNode::Leaf(_) => return None,
        }
    }
    Some(node)
}

/// Renders a forest back to display text, one entry per line, the marker run
/// restating the entry's depth. Every leaf goes through the tag resolver.
pub fn format_forest(forest: &[ListNode]) -> String {
    let mut lines = Vec::new();
    for entry in forest {
        format_node(entry, 1, &mut lines);
    }
    lines.join("\n")
}

/// Renders a single top-level entry and its children.
pub fn format_entry(entry: &ListNode) -> String {
    let mut lines = Vec::new();
    format_node(entry, 1, &mut lines);
    lines.join("\n")
}

fn format_node(node: &ListNode, depth: usize, lines: &mut Vec<String>) {
    match node {
        ListNode::Leaf(text) => {
            lines.push(format!("{} {}", "*".repeat(depth), template::render(text)));
        }
        ListNode::Branch(children) => {
            let mut children = children.iter();
            if let Some(own) = children.next() {
                format_node(own, depth, lines);
            }
            for child in children {
                format_node(child, depth + 1, lines);
            }
        }
    }
}

/// In-order traversal yielding `(depth, text)` for every entry.
pub fn flatten(forest: &[ListNode]) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    for entry in forest {
        flatten_node(entry, 1, &mut out);
    }
    out
}

fn flatten_node<'a>(node: &'a ListNode, depth: usize, out: &mut Vec<(usize, &'a str)>) {
    match node {
        ListNode::Leaf(text) => out.push((depth, text)),
        ListNode::Branch(children) => {
            let mut children = children.iter();
            if let Some(own) = children.next() {
                flatten_node(own, depth, out);
            }
            for child in children {
                flatten_node(child, depth + 1, out);
            }
        }
    }
}
