//! Reads stylesheet text back into rule blocks.

/// One rule block: selector plus its declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl CssRule {
    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Parses CSS text into rule blocks.
///
/// Comments are dropped, grouping at-rules (`@media`, `@supports`, ...) are
/// flattened into their inner rules, and blocks without declarations are
/// kept so that every emitted block can be counted.
pub fn parse_stylesheet(input: &str) -> Vec<CssRule> {
    let sanitized = strip_comments(input);
    let mut rules = Vec::new();
    collect_rules(&sanitized, &mut rules);
    rules
}

/// Tracks whether the scanner is inside a quoted string.
#[derive(Debug, Default)]
struct Quotes {
    open: Option<char>,
    escape: bool,
}

impl Quotes {
    /// Feeds one character; returns true if it belongs to a string literal.
    fn feed(&mut self, ch: char) -> bool {
        if let Some(quote) = self.open {
            if self.escape {
                self.escape = false;
            } else if ch == '\\' {
                self.escape = true;
            } else if ch == quote {
                self.open = None;
            }
            return true;
        }

        if ch == '"' || ch == '\'' {
            self.open = Some(ch);
            return true;
        }

        false
    }
}

fn collect_rules(input: &str, out: &mut Vec<CssRule>) {
    let mut cursor = 0_usize;

    while let Some((selector_raw, body_raw, next_cursor)) = next_rule_block(input, cursor) {
        cursor = next_cursor;

        let selector = collapse_whitespace(selector_raw);
        if selector.is_empty() {
            continue;
        }

        if is_grouping_at_rule(&selector) {
            collect_rules(body_raw, out);
            continue;
        }

        out.push(CssRule {
            selector,
            declarations: read_declarations(body_raw),
        });
    }
}

fn next_rule_block(input: &str, from: usize) -> Option<(&str, &str, usize)> {
    let start = input[from..]
        .find(|ch: char| !ch.is_whitespace() && ch != ';')
        .map(|offset| from + offset)?;

    let open = find_top_level(&input[start..], '{').map(|offset| start + offset)?;
    let close = find_matching_brace(input, open)?;

    Some((&input[start..open], &input[open + 1..close], close + 1))
}

/// Byte offset of the first `target` outside strings, parentheses and brackets.
fn find_top_level(input: &str, target: char) -> Option<usize> {
    let mut quotes = Quotes::default();
    let mut depth = 0_u32;

    for (idx, ch) in input.char_indices() {
        if quotes.feed(ch) {
            continue;
        }

        match ch {
            '(' | '[' => depth = depth.saturating_add(1),
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if ch == target && depth == 0 => return Some(idx),
            _ => {}
        }
    }

    None
}

fn find_matching_brace(input: &str, open: usize) -> Option<usize> {
    let mut quotes = Quotes::default();
    let mut depth = 0_u32;

    for (offset, ch) in input[open..].char_indices() {
        if quotes.feed(ch) {
            continue;
        }

        match ch {
            '{' => depth = depth.saturating_add(1),
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn split_top_level(input: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = input;

    while let Some(idx) = find_top_level(rest, delimiter) {
        parts.push(&rest[..idx]);
        rest = &rest[idx + delimiter.len_utf8()..];
    }
    parts.push(rest);

    parts
}

fn read_declarations(body: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();

    for declaration in split_top_level(body, ';') {
        let trimmed = declaration.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(colon) = find_top_level(trimmed, ':') else {
            continue;
        };

        let name = trimmed[..colon].trim();
        let value = collapse_value(&trimmed[colon + 1..]);
        if name.is_empty() || value.is_empty() {
            continue;
        }

        declarations.push((name.to_owned(), value));
    }

    declarations
}

fn is_grouping_at_rule(selector: &str) -> bool {
    let lower = selector.to_ascii_lowercase();
    ["@media", "@supports", "@layer", "@document"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut quotes = Quotes::default();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if !quotes.feed(ch) && ch == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut previous = '\0';
            for inner in chars.by_ref() {
                if previous == '*' && inner == '/' {
                    break;
                }
                previous = inner;
            }
            continue;
        }
        out.push(ch);
    }

    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut quotes = Quotes::default();
    let mut pending_space = false;

    for ch in input.trim().chars() {
        let quoted = quotes.feed(ch);
        if !quoted && ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}
