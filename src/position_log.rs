use std::sync::LazyLock;

use regex::Regex;

use crate::token::Token;

static POSITION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Text: (?P<text>.*), Position: \((?P<x>\d+), (?P<y>\d+)\), Size: (?P<w>\d+)x(?P<h>\d+), Confidence: (?P<conf>\d+)",
    )
    .expect("hardcoded position line regex is valid")
});

/// Parses one `Text: .., Position: (x, y), Size: WxH, Confidence: C` line.
///
/// Only the integer part of the confidence is read. Anything that does not
/// fit the grammar yields `None`.
pub fn parse_position_line(line: &str) -> Option<Token> {
    let captures = POSITION_LINE_RE.captures(line.trim())?;
    let number = |name: &str| captures.name(name)?.as_str().parse::<i64>().ok();

    Some(Token {
        text: captures.name("text")?.as_str().to_string(),
        x: number("x")?,
        y: number("y")?,
        width: number("w")?,
        height: number("h")?,
        confidence: captures.name("conf")?.as_str().parse::<f64>().ok()?,
    })
}

/// Parses a whole position log. Malformed lines are dropped without a trace.
pub fn parse_position_log(text: &str) -> Vec<Token> {
    text.lines().filter_map(parse_position_line).collect()
}

#[must_use]
pub fn format_position_line(token: &Token) -> String {
    format!(
        "Text: {}, Position: ({}, {}), Size: {}x{}, Confidence: {}",
        token.text, token.x, token.y, token.width, token.height, token.confidence
    )
}

#[must_use]
pub fn format_position_log(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(format_position_line)
        .collect::<Vec<_>>()
        .join("\n")
}
