//! Line-level rewriting of numeric resupply directives
//!
//! Each line of a properties fragment is tested against the known directives
//! in a fixed priority order; the first match decides what happens to the
//! line. Output is always terminated `\r\n`, which also normalizes fragments
//! with mixed line endings.

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Patch one physical line (without its terminator)
///
/// Returns the rewritten line. A recognized directive with no number in its
/// slot is an error; the whole document is considered unpatchable then.
pub fn patch_line(line: &str, settings: &Settings) -> Result<String> {
    if let Some(after) = find_directive(line, "radius") {
        log::trace!("modifying radius");
        return multiply_number(line, after, settings.radius_multiplier, "radius");
    }
    if let Some(after) = find_directive(line, "resupplyPeriod") {
        log::trace!("modifying resupply period");
        return replace_number(line, after, settings.resupply_period, "resupplyPeriod");
    }
    if let Some(after) = find_directive(line, "regenerationPeriod") {
        log::trace!("modifying regeneration period");
        return replace_number(line, after, settings.regeneration_period, "regenerationPeriod");
    }
    if let Some(after) = find_directive(line, "limit") {
        return patch_limit(line, after, settings);
    }
    Ok(line.to_string())
}

/// Patch a whole document, line by line
///
/// Every line of the result ends with `\r\n` whether or not it matched a
/// directive.
pub fn patch_document(text: &str, settings: &Settings) -> Result<String> {
    let mut out = String::with_capacity(text.len());

    for line in lines_of(text) {
        out.push_str(&patch_line(line, settings)?);
        out.push_str("\r\n");
    }

    Ok(out)
}

/// Iterate physical lines without their terminators
///
/// A trailing newline does not produce a final empty line, and empty input
/// has no lines at all.
pub(crate) fn lines_of(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    let mut lines = trimmed.split('\n');
    if text.is_empty() {
        lines.next();
    }
    lines.map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Find a `{keyword` directive in the line
///
/// The character after the keyword must open a numeric slot (whitespace, a
/// digit, the `%supply` placeholder, or end of line), so `{limitXyz` is not a
/// `limit` directive. Returns the byte offset just past the keyword.
fn find_directive(line: &str, keyword: &str) -> Option<usize> {
    let needle = format!("{{{keyword}");
    let mut start = 0;

    while let Some(pos) = line[start..].find(&needle) {
        let after = start + pos + needle.len();
        match line[after..].chars().next() {
            None => return Some(after),
            Some(c) if c.is_whitespace() || c.is_ascii_digit() || c == '%' => return Some(after),
            Some(_) => start += pos + 1,
        }
    }

    None
}

/// Locate the first contiguous digit run at or after `from`
fn find_number(line: &str, from: usize) -> Option<(usize, usize)> {
    let rel = line[from..].find(|c: char| c.is_ascii_digit())?;
    let start = from + rel;
    let len = line[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len() - start);
    Some((start, len))
}

fn missing_number(directive: &str, line: &str) -> Error {
    Error::MissingNumericLiteral {
        directive: directive.to_string(),
        line: line.to_string(),
    }
}

/// Multiply the digit run after the keyword in place
fn multiply_number(line: &str, after: usize, multiplier: i64, directive: &str) -> Result<String> {
    let (start, len) = find_number(line, after).ok_or_else(|| missing_number(directive, line))?;
    // a digit run too long for i64 is no usable literal either
    let number: i64 = line[start..start + len]
        .parse()
        .map_err(|_| missing_number(directive, line))?;
    log::trace!("replacing number {} with {}", number, number * multiplier);
    Ok(format!(
        "{}{}{}",
        &line[..start],
        number * multiplier,
        &line[start + len..]
    ))
}

/// Replace the digit run after the keyword with a fixed value
fn replace_number(line: &str, after: usize, new_value: i64, directive: &str) -> Result<String> {
    let (start, len) = find_number(line, after).ok_or_else(|| missing_number(directive, line))?;
    Ok(format!(
        "{}{}{}",
        &line[..start],
        new_value,
        &line[start + len..]
    ))
}

/// A limit slot holds either digits or the literal `%supply`
fn patch_limit(line: &str, after: usize, settings: &Settings) -> Result<String> {
    if find_number(line, after).is_some() {
        log::trace!("modifying limit");
        return multiply_number(line, after, settings.limit_multiplier, "limit");
    }

    const PLACEHOLDER: &str = "%supply";
    if let Some(rel) = line[after..].find(PLACEHOLDER) {
        log::trace!("modifying limit %supply");
        let start = after + rel;
        return Ok(format!(
            "{}{}{}",
            &line[..start],
            settings.limit_fallback,
            &line[start + PLACEHOLDER.len()..]
        ));
    }

    Err(missing_number("limit", line))
}
