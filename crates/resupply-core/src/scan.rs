//! Locating item-list and resupply blocks inside a properties fragment
//!
//! The fragments use a small paren/brace syntax; only three constructs matter
//! here and all of them are line-delimited, so blocks are found by walking
//! lines instead of pattern-matching the whole buffer:
//!
//! ```text
//! (define "items_light_w2"
//!     (mod "winter"
//!     {item "ammo" "rifle" 3 {value 90}}
//!     )
//! )
//! ```
//!
//! A category block opens with a `(define "<name>"` header and closes at the
//! first line starting with `)` in column zero. A resupply block opens with a
//! bare `{resupply` line and closes at a line of tabs followed by `}`.
//! Offsets are byte positions into the scanned text, captured so the caller
//! can splice replacements back without re-searching.

use crate::item::Item;

/// The equipment categories whose item lists get merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Light,
    Heavy,
    Medic,
    Engineer,
    Explosives,
}

impl Category {
    /// All categories, in canonical output order
    pub const ALL: [Category; 5] = [
        Category::Medic,
        Category::Light,
        Category::Heavy,
        Category::Engineer,
        Category::Explosives,
    ];

    /// Categories whose references appear in resupply blocks
    pub const RESUPPLY: [Category; 3] = [Category::Light, Category::Heavy, Category::Medic];

    /// Name of the merged list this category collapses into
    pub fn canonical_name(self) -> &'static str {
        match self {
            Category::Light => "items_light_all",
            Category::Heavy => "items_heavy_all",
            Category::Medic => "items_medic_all",
            Category::Engineer => "items_engineer",
            Category::Explosives => "items_explosives",
        }
    }

    /// Quoted-reference prefix used inside resupply blocks
    pub fn reference_prefix(self) -> &'static str {
        match self {
            Category::Light => "items_light",
            Category::Heavy => "items_heavy",
            Category::Medic => "items_medic",
            Category::Engineer => "items_engineer",
            Category::Explosives => "items_explosives",
        }
    }

    /// Does a `(define "<name>"` header belong to this category?
    ///
    /// Light and heavy lists are always suffixed (`items_light_w2`), medic
    /// lists may or may not be (`items_medic`, `items_medic2`), engineer and
    /// explosives lists have exactly one spelling.
    pub fn matches_block_name(self, name: &str) -> bool {
        match self {
            Category::Light => name
                .strip_prefix("items_light_")
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_word)),
            Category::Heavy => name
                .strip_prefix("items_heavy_")
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_word)),
            Category::Medic => name
                .strip_prefix("items_medic")
                .is_some_and(|rest| rest.chars().all(is_word)),
            Category::Engineer => name == "items_engineer",
            Category::Explosives => name == "items_explosives",
        }
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A category block located in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// Byte offset of the block header's opening paren
    pub offset: usize,
    /// Length of the block, header through closing paren
    pub len: usize,
    /// Byte offset of the interior text (first line after the header)
    pub interior_offset: usize,
    /// Length of the interior, excluding the terminator before the close
    pub interior_len: usize,
    /// Length of block plus terminator plus any empty lines that follow,
    /// used when deleting stale duplicates without leaving gaps
    pub removal_len: usize,
}

impl BlockSpan {
    /// Interior text of this block within `text`
    pub fn interior<'a>(&self, text: &'a str) -> &'a str {
        &text[self.interior_offset..self.interior_offset + self.interior_len]
    }
}

/// A resupply block located in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResupplySpan {
    /// Byte offset of the interior (first line after `{resupply`)
    pub interior_offset: usize,
    /// Length of the interior, including the last line's terminator
    pub interior_len: usize,
}

impl ResupplySpan {
    /// Interior text of this block within `text`
    pub fn interior<'a>(&self, text: &'a str) -> &'a str {
        &text[self.interior_offset..self.interior_offset + self.interior_len]
    }
}

/// A physical line with its position in the scanned text
struct LineSpan<'a> {
    /// Byte offset of the first character of the line
    start: usize,
    /// Line content without its terminator
    content: &'a str,
    /// Byte offset just past the terminator
    end: usize,
}

fn line_spans(text: &str) -> impl Iterator<Item = LineSpan<'_>> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= text.len() {
            return None;
        }
        let start = pos;
        let (content, end) = match text[start..].find('\n') {
            Some(rel) => (&text[start..start + rel], start + rel + 1),
            None => (&text[start..], text.len()),
        };
        pos = end;
        Some(LineSpan {
            start,
            content: content.strip_suffix('\r').unwrap_or(content),
            end,
        })
    })
}

/// Name from a `(define "<name>"` header line, if this is one
fn define_header(content: &str) -> Option<&str> {
    let trimmed = content.trim_start();
    let name = trimmed.strip_prefix("(define \"")?.strip_suffix('"')?;
    if name.contains('"') {
        return None;
    }
    Some(name)
}

/// Find every block of `category` in `text`, in document order
pub fn find_category_blocks(text: &str, category: Category) -> Vec<BlockSpan> {
    let mut blocks = Vec::new();
    let mut lines = line_spans(text).peekable();

    while let Some(line) = lines.next() {
        let Some(name) = define_header(line.content) else {
            continue;
        };
        if !category.matches_block_name(name) {
            continue;
        }

        let indent = line.content.len() - line.content.trim_start().len();
        let offset = line.start + indent;
        let interior_offset = line.end;
        let mut interior_end = line.end;

        // consume lines until the column-zero closing paren
        let mut close = None;
        for inner in lines.by_ref() {
            if inner.content.starts_with(')') {
                close = Some((inner.start + 1, inner.end));
                break;
            }
            // interior runs up to the terminator before the closing line
            interior_end = inner.start + inner.content.len();
        }
        let Some((block_end, mut removal_end)) = close else {
            // unterminated block at end of document, nothing to extract
            break;
        };

        // absorb empty lines directly after the block
        while let Some(next) = lines.peek() {
            if !next.content.is_empty() {
                break;
            }
            removal_end = next.end;
            lines.next();
        }

        blocks.push(BlockSpan {
            offset,
            len: block_end - offset,
            interior_offset,
            interior_len: interior_end.saturating_sub(interior_offset),
            removal_len: removal_end - offset,
        });
    }

    blocks
}

/// Find every resupply block in `text`, in document order
pub fn find_resupply_blocks(text: &str) -> Vec<ResupplySpan> {
    let mut blocks = Vec::new();
    let mut lines = line_spans(text);

    while let Some(line) = lines.next() {
        if line.content.trim_start() != "{resupply" {
            continue;
        }

        let interior_offset = line.end;
        for inner in lines.by_ref() {
            if is_resupply_close(inner.content) {
                blocks.push(ResupplySpan {
                    interior_offset,
                    interior_len: inner.start - interior_offset,
                });
                break;
            }
        }
    }

    blocks
}

/// Closing line of a resupply block: one or more tabs then `}`
fn is_resupply_close(content: &str) -> bool {
    content
        .strip_suffix('}')
        .is_some_and(|tabs| !tabs.is_empty() && tabs.chars().all(|c| c == '\t'))
}

/// Decode the item records of a block interior
///
/// A line opening with `(` arms a condition guard for the next item line;
/// anything else between records (closing parens, comments, blank lines) is
/// skipped.
pub fn items_in_block(interior: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut condition = String::new();

    for line in crate::patch::lines_of(interior) {
        let trimmed = line.trim();
        if trimmed.starts_with("{item") {
            let mut item = Item::parse(trimmed);
            if !condition.is_empty() {
                item.condition = std::mem::take(&mut condition);
            }
            items.push(item);
        } else if trimmed.starts_with('(') {
            condition = trimmed.to_string();
        }
    }

    items
}
