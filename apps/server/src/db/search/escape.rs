//! Escaping helpers for query parameter lists and SQL `LIKE` patterns.
//!
//! List-valued query parameters may be repeated or comma separated; a literal
//! comma inside one value is written as `\,` and a literal backslash as `\\`.

/// Split `input` on `sep`, ignoring separators preceded by a backslash.
pub(crate) fn split_unescaped(input: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == sep {
            out.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    out.push(&input[start..]);
    out
}

/// Resolve `\,` and `\\` escapes. Unknown escapes are kept verbatim.
pub(crate) fn unescape_list_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ (',' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a list-valued parameter into trimmed, unescaped, non-empty items.
pub(crate) fn split_list_value(input: &str) -> Vec<String> {
    split_unescaped(input, ',')
        .into_iter()
        .map(|s| unescape_list_value(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Escape SQL `LIKE` meta-characters so user input is matched literally.
pub(crate) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
