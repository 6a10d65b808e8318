//! Collapsing item-list references inside resupply blocks
//!
//! After the canonical `items_<category>_all` lists exist, a resupply block
//! only needs a single reference per category. The rewrite runs in two
//! passes over each document: the first collapses the references of every
//! block, the second strips the blank lines the collapse leaves behind.
//! Both passes capture their edits against an unmutated snapshot and apply
//! them through the splicer, because several blocks are rewritten per scan.

use crate::error::Result;
use crate::patch::lines_of;
use crate::scan::{find_resupply_blocks, Category};
use crate::splice::{splice, TextEdit};

/// Apply both rewrite passes to one document
pub fn rewrite_document(text: &mut String) -> Result<()> {
    splice(text, collapse_edits(text))?;
    splice(text, cleanup_edits(text))?;
    Ok(())
}

/// Pass one: per block, one `_all` reference per category, extras deleted
pub fn collapse_edits(text: &str) -> Vec<TextEdit> {
    find_resupply_blocks(text)
        .iter()
        .map(|block| {
            let mut interior = block.interior(text).to_string();
            for category in Category::RESUPPLY {
                interior = collapse_category(&interior, category);
            }
            TextEdit::new(block.interior_offset, block.interior_len, interior)
        })
        .collect()
}

/// Pass two: drop blank interior lines, right-trim the rest
pub fn cleanup_edits(text: &str) -> Vec<TextEdit> {
    find_resupply_blocks(text)
        .iter()
        .map(|block| {
            let mut replacement = String::new();
            for line in lines_of(block.interior(text)) {
                if !line.trim().is_empty() {
                    replacement.push_str(line.trim_end());
                    replacement.push_str("\r\n");
                }
            }
            TextEdit::new(block.interior_offset, block.interior_len, replacement)
        })
        .collect()
}

/// Rewrite one category's references within a block interior
///
/// The first matching reference becomes the canonical one, the rest vanish.
/// The canonical `_all` name itself never matches, so the rewrite is
/// idempotent.
fn collapse_category(interior: &str, category: Category) -> String {
    let needle = format!("(\"{}", category.reference_prefix());
    let canonical = format!("(\"{}\")", category.canonical_name());

    let mut out = String::with_capacity(interior.len());
    let mut pos = 0;
    let mut replaced = false;

    while let Some(rel) = interior[pos..].find(&needle) {
        let start = pos + rel;
        let after = start + needle.len();
        match reference_suffix_len(&interior[after..]) {
            Some(len) => {
                out.push_str(&interior[pos..start]);
                if !replaced {
                    out.push_str(&canonical);
                    replaced = true;
                }
                // skip suffix plus closing `")`
                pos = after + len + 2;
            }
            None => {
                out.push_str(&interior[pos..after]);
                pos = after;
            }
        }
    }
    out.push_str(&interior[pos..]);
    out
}

/// Length of a collapsible reference suffix
///
/// One to eight word characters not spelling the `_all` suffix, closed by
/// `")`.
fn reference_suffix_len(rest: &str) -> Option<usize> {
    if rest.starts_with("_all") {
        return None;
    }
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if (1..=8).contains(&len) && rest[len..].starts_with("\")") {
        Some(len)
    } else {
        None
    }
}
