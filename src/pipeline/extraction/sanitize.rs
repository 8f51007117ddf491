/// Sanitize redacted report text before the strategies see it.
/// Strips control characters, normalizes dashes and non-breaking spaces,
/// trims each line and drops blank lines. Tabs survive: they mark columns.
pub fn sanitize_report_text(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\r' => None,
            '\n' | '\t' => Some(c),
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
            '\u{2013}' | '\u{2014}' | '\u{2012}' => Some('-'),
            c if c.is_control() => None,
            c if is_allowed(c) => Some(c),
            _ => None,
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim_matches(' '))
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Alphanumerics, whitespace, and the punctuation lab reports rely on:
/// units (`µ`, `³`, `^`), inequalities, decimal marks, brackets.
fn is_allowed(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ','
                | ';'
                | ':'
                | '-'
                | '/'
                | '('
                | ')'
                | '['
                | ']'
                | '+'
                | '='
                | '%'
                | '#'
                | '&'
                | '\''
                | '"'
                | '!'
                | '?'
                | '<'
                | '>'
                | '*'
                | '_'
                | '|'
                | '^'
                | '°'
                | '²'
                | '³'
                | 'µ'
                | '±'
                | '≤'
                | '≥'
                | '⁄'
                | '：'
                | '\u{2212}' // Minus sign −
                | '\u{2019}' // Right single quotation mark
                | '\u{2018}' // Left single quotation mark
        )
}

/// Collapse a sanitized line for the line-based strategies: column breaks
/// and `|` rules become spaces, runs of spaces collapse to one.
pub fn flatten_line(line: &str) -> String {
    line.split(|c: char| c.is_whitespace() || c == '|')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
