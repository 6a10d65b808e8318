//! Merge engine for collapsing per-document item lists into canonical ones
//!
//! Every document of a mod may carry its own `(define "items_<category>...")`
//! blocks. The merger gathers the items of one category across the whole
//! document set, sorts and deduplicates them, and renders a single canonical
//! block. The per-document blocks are then replaced by one include directive
//! (first occurrence) or deleted outright (the rest).

use crate::item::Item;
use crate::scan::{find_category_blocks, items_in_block, Category};
use crate::splice::TextEdit;

/// Extract every item of `category` from one document
pub fn collect_items(text: &str, category: Category) -> Vec<Item> {
    find_category_blocks(text, category)
        .iter()
        .flat_map(|block| items_in_block(block.interior(text)))
        .collect()
}

/// Sort by the string-field sequence and drop duplicate identities
///
/// Identity is (strings, condition); the first entry of a duplicate run
/// survives, so differing `unknown`/`value` numbers on later duplicates are
/// lost. The sort is stable, leaving equal keys in discovery order.
pub fn canonicalize(items: &mut Vec<Item>) {
    items.sort_by(|a, b| a.strings.cmp(&b.strings));
    items.dedup_by(|a, b| a.strings == b.strings && a.condition == b.condition);
}

/// Render the canonical block for a category
pub fn render_canonical_block(category: Category, items: &[Item]) -> String {
    let mut out = format!("(define \"{}\"\r\n", category.canonical_name());
    for item in items {
        out.push_str(&item.to_string());
        out.push_str("\r\n");
    }
    out.push_str(")\r\n");
    out
}

/// Edits that collapse a document's blocks of `category` down to one include
///
/// The first block becomes `(include "<canonical>.inc")`; every later block
/// is removed together with the blank lines behind it. All edits are
/// positioned against the unmodified document and must be applied in one
/// splice batch.
pub fn replacement_edits(text: &str, category: Category) -> Vec<TextEdit> {
    let include = format!("(include \"{}.inc\")", category.canonical_name());

    find_category_blocks(text, category)
        .iter()
        .enumerate()
        .map(|(i, block)| {
            if i == 0 {
                TextEdit::new(block.offset, block.len, include.clone())
            } else {
                TextEdit::new(block.offset, block.removal_len, "")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splice::splice;

    fn item(strings: &[&str], value: i64) -> Item {
        Item {
            strings: strings.iter().map(|s| s.to_string()).collect(),
            unknown: 1,
            value,
            condition: String::new(),
        }
    }

    #[test]
    fn test_dedup_keeps_one_survivor() {
        let mut items = vec![item(&["a", "b"], 1), item(&["a", "b"], 2)];
        canonicalize(&mut items);
        assert_eq!(items.len(), 1);
        // the numeric fields of later duplicates are discarded
        assert_eq!(items[0].value, 1);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let mut items = vec![item(&["a", "b"], 1), item(&["a", "b"], 2)];
        canonicalize(&mut items);
        canonicalize(&mut items);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_differing_conditions_both_survive() {
        let mut guarded = item(&["a"], 1);
        guarded.condition = "(mod \"winter\"".to_string();
        let mut items = vec![item(&["a"], 1), guarded];
        canonicalize(&mut items);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_sort_order() {
        let mut items = vec![
            item(&["items", "light", "01"], 1),
            item(&["items", "heavy", "01"], 1),
        ];
        canonicalize(&mut items);
        assert_eq!(items[0].strings[1], "heavy");
        assert_eq!(items[1].strings[1], "light");
    }

    #[test]
    fn test_prefix_sorts_first() {
        let mut items = vec![item(&["ammo", "extra"], 1), item(&["ammo"], 1)];
        canonicalize(&mut items);
        assert_eq!(items[0].strings, vec!["ammo"]);
    }

    #[test]
    fn test_render_canonical_block() {
        let items = vec![item(&["mp_40", "mp_38_40"], 8)];
        let block = render_canonical_block(Category::Light, &items);
        assert_eq!(
            block,
            "(define \"items_light_all\"\r\n\t{item \"mp_40\" \"mp_38_40\" 1 {value 8}}\r\n)\r\n"
        );
    }

    #[test]
    fn test_render_empty_block() {
        assert_eq!(
            render_canonical_block(Category::Engineer, &[]),
            "(define \"items_engineer\"\r\n)\r\n"
        );
    }

    const DOC: &str = "\
(define \"items_light_w2\"\r\n\
\t{item \"mp_40\" 2 {value 8}}\r\n\
)\r\n\
\r\n\
(define \"items_light_vet\"\r\n\
\t{item \"mp_40\" 2 {value 8}}\r\n\
\t{item \"stg_44\" 2 {value 6}}\r\n\
)\r\n\
\r\n\
(define \"items_heavy_at\"\r\n\
\t{item \"panzerfaust\" 1 {value 2}}\r\n\
)\r\n";

    #[test]
    fn test_collect_items_across_blocks() {
        let items = collect_items(DOC, Category::Light);
        assert_eq!(items.len(), 3);
        let items = collect_items(DOC, Category::Heavy);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_replacement_edits_collapse_document() {
        let mut text = DOC.to_string();
        let mut edits = replacement_edits(&text, Category::Light);
        edits.extend(replacement_edits(&text, Category::Heavy));
        splice(&mut text, edits).unwrap();

        assert_eq!(
            text,
            "(include \"items_light_all.inc\")\r\n\
             \r\n\
             (include \"items_heavy_all.inc\")\r\n"
        );
    }

    #[test]
    fn test_merged_items_deduplicate() {
        let mut items = collect_items(DOC, Category::Light);
        canonicalize(&mut items);
        // mp_40 appears twice across the two blocks
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].strings, vec!["mp_40"]);
        assert_eq!(items[1].strings, vec!["stg_44"]);
    }
}
