//! Offsets and ranges for insertions and removals.
//!
//! Everything here works on plain text and ranges so it can be tested
//! without a project. Ranges of list items are their *attached* ranges:
//! they start at the first JSDoc or same-line comment owned by the item.

use morph_syntax::SyntaxKind::{self, *};
use text_size::{TextRange, TextSize};

/// Where the `index`th new item goes in a list of `items`, or `None` when
/// `index` is past the end. An empty list inserts right after `open`.
pub fn insertion_offset(open: TextSize, items: &[TextRange], index: usize) -> Option<TextSize> {
    if index > items.len() {
        return None;
    }
    Some(match items.get(index) {
        Some(item) => item.start(),
        None => items.last().map_or(open, |last| last.end()),
    })
}

/// How an insertion is separated from its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    /// A blank line goes between the preceding item and the first new one.
    pub blank_before: bool,
    /// A blank line goes between the last new item and the following one.
    pub blank_after: bool,
    /// New items are separated by a single newline rather than a blank line.
    pub separator_newline: bool,
}

pub fn blank_line_policy(
    preceding: Option<SyntaxKind>,
    following: Option<SyntaxKind>,
    inserted: SyntaxKind,
    needs_blank: impl Fn(SyntaxKind) -> bool,
) -> Spacing {
    let wants_blank = needs_blank(inserted);
    let around = |neighbour: Option<SyntaxKind>| {
        neighbour.is_some_and(|kind| !kind.is_comment() && (wants_blank || needs_blank(kind)))
    };

    Spacing {
        blank_before: around(preceding),
        blank_after: around(following),
        separator_newline: !wants_blank,
    }
}

/// Statements that get a blank line around them.
pub fn statement_needs_blank_line(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        CLASS_DECLARATION
            | INTERFACE_DECLARATION
            | FUNCTION_DECLARATION
            | MODULE_DECLARATION
            | ENUM_DECLARATION
    )
}

/// The whitespace that starts the line containing `offset`.
pub fn indentation_at(text: &str, offset: TextSize) -> &str {
    let offset = usize::from(offset).min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |newline| newline + 1);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Prefixes every line but the first with `indent`, leaving blank lines
/// empty, and writes `newline` between lines.
pub fn indent_text(text: &str, indent: &str, newline: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (index, line) in text.lines().enumerate() {
        if index > 0 {
            result.push_str(newline);
            if !line.trim().is_empty() {
                result.push_str(indent);
            }
        }
        result.push_str(if index > 0 && line.trim().is_empty() { "" } else { line });
    }
    result
}

/// Drops blank lines around `text` and `indent` from the front of each line.
pub fn dedent_text(text: &str, indent: &str) -> String {
    let lines = text.lines().collect::<Vec<_>>();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else { return String::new() };

    lines[first..=last]
        .iter()
        .map(|line| line.strip_prefix(indent).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The first non-whitespace offset of `range`, capped at `start`.
pub fn attached_start(text: &str, range: TextRange, start: TextSize) -> TextSize {
    let gap = &text[TextRange::new(range.start(), start)];
    let whitespace = gap.len() - gap.trim_start().len();
    range.start() + TextSize::of(&gap[..whitespace])
}

/// What to delete when removing the statement or member at `range`.
///
/// A node alone on its lines takes its indentation and line break with it,
/// plus one blank line when that keeps the surrounding spacing even.
pub fn statement_removal_range(text: &str, range: TextRange) -> TextRange {
    let mut start = usize::from(range.start());
    let mut end = usize::from(range.end());

    let line_start = text[..start].rfind('\n').map_or(0, |newline| newline + 1);
    let starts_line = text[line_start..start].bytes().all(|byte| matches!(byte, b' ' | b'\t'));
    let after = end + text[end..].len() - text[end..].trim_start_matches([' ', '\t']).len();
    let rest = &text[after..];
    let ends_line = rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n");

    if !starts_line || !ends_line {
        return TextRange::new(range.start(), size(after));
    }

    start = line_start;
    end = after + line_break_len(rest);

    let opening = text[..start].trim_end().ends_with('{') || text[..start].trim().is_empty();
    let closing = {
        let rest = text[end..].trim_start();
        rest.is_empty() || rest.starts_with('}')
    };

    match (blank_line_before(text, start), blank_line_after(text, end)) {
        (before, Some(after)) if before.is_some() || opening => end = after,
        (Some(before), _) if closing => start = before,
        _ => {}
    }

    TextRange::new(size(start), size(end))
}

fn line_break_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else {
        usize::from(text.starts_with('\n'))
    }
}

/// Start of the whitespace-only line that ends right before `line_start`.
fn blank_line_before(text: &str, line_start: usize) -> Option<usize> {
    let previous = text[..line_start].strip_suffix('\n')?;
    let previous = previous.strip_suffix('\r').unwrap_or(previous);
    let previous_start = previous.rfind('\n').map_or(0, |newline| newline + 1);
    previous[previous_start..].trim().is_empty().then_some(previous_start)
}

/// End of the whitespace-only line that starts at `line_start`.
fn blank_line_after(text: &str, line_start: usize) -> Option<usize> {
    let line_end = line_start + text[line_start..].find('\n')?;
    text[line_start..line_end].trim().is_empty().then_some(line_end + 1)
}

/// The item and one adjacent comma: the following one, or the preceding
/// one for the last item. A sole item takes its trailing comma.
pub fn comma_list_removal(text: &str, items: &[TextRange], index: usize) -> Option<TextRange> {
    let item = *items.get(index)?;
    let previous = index.checked_sub(1).map(|previous| items[previous]);

    Some(match (previous, items.get(index + 1)) {
        (_, Some(next)) => TextRange::new(item.start(), next.start()),
        (Some(previous), None) => TextRange::new(previous.end(), item.end()),
        (None, None) => {
            let rest = &text[usize::from(item.end())..];
            let trimmed = rest.trim_start();
            match trimmed.strip_prefix(',') {
                Some(after) => {
                    let comma_end = rest.len() - after.len();
                    TextRange::new(item.start(), item.end() + size(comma_end))
                }
                None => item,
            }
        }
    })
}

/// Offset and text inserting `texts` as a `, `-separated run at `index`.
pub fn comma_list_insertion(
    open: TextSize,
    items: &[TextRange],
    index: usize,
    texts: &[String],
) -> Option<(TextSize, String)> {
    let offset = insertion_offset(open, items, index)?;
    let joined = texts.join(", ");

    let text = if items.is_empty() {
        joined
    } else if index == items.len() {
        format!(", {joined}")
    } else {
        format!("{joined}, ")
    };
    Some((offset, text))
}

fn size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::new(u32::MAX))
}
