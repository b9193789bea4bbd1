//! Fixed-vocabulary extractors for engineering-plan sheets.

pub mod atm;
pub mod panel;

/// Slice from the start of `head` up to the first `end` match that begins at
/// least one character after `head`. `None` when no such match exists.
pub(crate) fn span_until<'t>(
    text: &'t str,
    head: regex::Match<'t>,
    end: &regex::Regex,
) -> Option<&'t str> {
    let next_char = text[head.end()..].chars().next()?;
    let terminator = end.find_at(text, head.end() + next_char.len_utf8())?;
    Some(&text[head.start()..terminator.start()])
}
