//! Parsers for the text members that name entry points
//!
//! Property files follow the `java.util.Properties` line format, decoded
//! as UTF-8. Service files list one class per line with `#` comments.

use std::collections::BTreeMap;

/// Parse property-file text into `(key, value)` pairs, in file order
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for logical in logical_lines(text) {
        let (key, value) = split_key_value(&logical);
        pairs.push((unescape(key), unescape(value)));
    }

    pairs
}

/// Load property-file text into a table; a repeated key keeps its last value
pub fn load_properties(text: &str) -> BTreeMap<String, String> {
    parse_properties(text).into_iter().collect()
}

/// Values of a property file, trimmed, blanks dropped
pub fn property_values(text: &str) -> Vec<String> {
    load_properties(text)
        .into_values()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Class names listed by a service-registration file
pub fn service_names(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = match line.find('#') {
                Some(hash) => &line[..hash],
                None => line,
            };
            let line = line.trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

/// Join continuation lines and drop comments and blank lines
fn logical_lines(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim_start_matches([' ', '\t', '\x0c']);

        if current.is_none() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let (content, continues) = strip_continuation(line);
        let mut logical = current.take().unwrap_or_default();
        logical.push_str(content);

        if continues {
            current = Some(logical);
        } else {
            result.push(logical);
        }
    }

    if let Some(logical) = current {
        result.push(logical);
    }

    result
}

/// A line continues when it ends in an odd number of backslashes
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

/// Split at the first unescaped `=`, `:` or whitespace
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    let value = rest.trim_start_matches([' ', '\t', '\x0c']);

    (key, value)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}
