//! Item record codec
//!
//! An item line looks like:
//!
//! ```text
//! {item "mine_antitank" "mine_antitank_ger" 2 {value 4}}
//! ```
//!
//! The quoted fields form the identity of the item; the bare integer before
//! the value section has unclear in-game meaning and is carried through
//! untouched. An item may be wrapped by a condition guard line in its source
//! block, which then belongs to that one record.

use std::fmt;

/// A single supply item entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    /// Quoted string fields, in source order
    pub strings: Vec<String>,
    /// Unquoted integer between the strings and the value section
    pub unknown: i64,
    /// Value from the `{value N}` section
    pub value: i64,
    /// Guard expression wrapping the record, empty when unconditional
    pub condition: String,
}

impl Item {
    /// Parse an item line
    ///
    /// Tolerant by design: a line missing the integer or the value section
    /// yields -1 for the missing field instead of an error.
    pub fn parse(line: &str) -> Self {
        let mut item = Item {
            unknown: -1,
            value: -1,
            ..Item::default()
        };

        let mut tokens = line.split_whitespace();
        // skip "{item"
        tokens.next();

        for token in tokens.by_ref() {
            if token.starts_with(|c: char| c.is_ascii_digit()) {
                item.unknown = leading_int(token).unwrap_or(-1);
                break;
            }
            item.strings.push(strip_quotes(token).to_string());
        }

        // skip "{value", then read the value itself
        tokens.next();
        if let Some(token) = tokens.next() {
            item.value = leading_int(token).unwrap_or(-1);
        }

        item
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.condition.is_empty() {
            write!(f, "\t{}\r\n", self.condition)?;
        }
        write!(f, "\t{{item")?;
        for s in &self.strings {
            write!(f, " \"{}\"", s)?;
        }
        write!(f, " {} {{value {}}}}}", self.unknown, self.value)?;
        if !self.condition.is_empty() {
            write!(f, "\r\n\t)")?;
        }
        Ok(())
    }
}

/// Remove exactly one leading and one trailing delimiter character
fn strip_quotes(token: &str) -> &str {
    if token.len() >= 2 {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// Parse the run of decimal digits at the start of a token
///
/// Trailing text such as the closing braces of `8}}` is ignored, matching
/// how the game files pack the value into the final token.
fn leading_int(token: &str) -> Option<i64> {
    let digits: &str = &token[..token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len())];
    digits.parse().ok()
}
