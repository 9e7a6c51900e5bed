//! Hand-rolled Markdown rendering.
//!
//! Converts Markdown source into an HTML fragment. This is a pure,
//! self-contained function: same input, same output, no external state.
//!
//! Supported constructs: ATX headings (1-6 `#`), paragraphs (one per
//! non-blank line), `*em*` / `**strong**`, inline code, fenced code blocks
//! with a language class, unordered (`- `) and ordered (`1. `) lists,
//! blockquotes (`> `), horizontal rules, inline links/images, and
//! reference-style links/images (`[text][id]` with `[id]: url`).
//!
//! All source text is HTML-escaped before any inline transform runs, so
//! user-controlled content can never inject markup; the only tags in the
//! output are the ones this module emits. Anything malformed falls
//! through as literal escaped text rather than failing.

use std::collections::HashMap;

use crate::files::page::escape_html;

enum ListKind {
    Unordered,
    Ordered,
}

/// Renders Markdown source to an HTML fragment.
pub fn render(source: &str) -> String {
    let refs = collect_references(source);

    let mut html: Vec<String> = Vec::new();
    let mut code_block: Option<(String, Vec<&str>)> = None; // (lang, lines)
    let mut list: Option<(ListKind, Vec<String>)> = None;

    for line in source.lines() {
        if reference_definition(line).is_some() {
            continue;
        }

        // Fenced code blocks swallow everything until the closing fence.
        if let Some(rest) = line.strip_prefix("```") {
            match code_block.take() {
                None => {
                    let lang: String = rest
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric())
                        .collect();
                    code_block = Some((lang, Vec::new()));
                }
                Some((lang, lines)) => {
                    flush_list(&mut list, &mut html);
                    html.push(close_code_block(&lang, &lines));
                }
            }
            continue;
        }
        if let Some((_, lines)) = code_block.as_mut() {
            lines.push(line);
            continue;
        }

        if is_horizontal_rule(line) {
            flush_list(&mut list, &mut html);
            html.push("<hr/>".to_string());
            continue;
        }

        if let Some((level, text)) = heading(line) {
            flush_list(&mut list, &mut html);
            html.push(format!(
                "<h{level}>{}</h{level}>",
                render_inline(text, &refs)
            ));
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            push_list_item(&mut list, &mut html, ListKind::Unordered, item, &refs);
            continue;
        }
        if let Some(item) = ordered_item(line) {
            push_list_item(&mut list, &mut html, ListKind::Ordered, item, &refs);
            continue;
        }
        flush_list(&mut list, &mut html);

        if let Some(quoted) = line.strip_prefix("> ") {
            html.push(format!(
                "<blockquote>{}</blockquote>",
                render_inline(quoted.trim(), &refs)
            ));
            continue;
        }

        if !line.trim().is_empty() {
            html.push(format!("<p>{}</p>", render_inline(line, &refs)));
        }
    }

    // An unclosed fence still renders as a code block.
    if let Some((lang, lines)) = code_block.take() {
        html.push(close_code_block(&lang, &lines));
    }
    flush_list(&mut list, &mut html);

    html.join("\n")
}

/// First pass: collect `[id]: url` reference definitions.
fn collect_references(source: &str) -> HashMap<String, String> {
    source.lines().filter_map(reference_definition).collect()
}

fn reference_definition(line: &str) -> Option<(String, String)> {
    let rest = line.trim_start().strip_prefix('[')?;
    let (id, after) = rest.split_once("]:")?;
    if id.is_empty() {
        return None;
    }
    let url = after.split_whitespace().next()?;
    Some((id.trim().to_string(), url.to_string()))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&level) {
        line[level..].strip_prefix(' ').map(|text| (level, text))
    } else {
        None
    }
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| matches!(c, '*' | '-' | '_'))
}

fn close_code_block(lang: &str, lines: &[&str]) -> String {
    let content = escape_html(&lines.join("\n"));
    if lang.is_empty() {
        format!("<pre><code>{content}</code></pre>")
    } else {
        format!("<pre><code class=\"language-{lang}\">{content}</code></pre>")
    }
}

fn push_list_item(
    list: &mut Option<(ListKind, Vec<String>)>,
    html: &mut Vec<String>,
    kind: ListKind,
    item: &str,
    refs: &HashMap<String, String>,
) {
    // Switching between ordered and unordered closes the open list.
    if matches!(
        (list.as_ref(), &kind),
        (Some((ListKind::Unordered, _)), ListKind::Ordered)
            | (Some((ListKind::Ordered, _)), ListKind::Unordered)
    ) {
        flush_list(list, html);
    }

    let rendered = format!("<li>{}</li>", render_inline(item.trim(), refs));
    match list {
        Some((_, items)) => items.push(rendered),
        None => *list = Some((kind, vec![rendered])),
    }
}

fn flush_list(list: &mut Option<(ListKind, Vec<String>)>, html: &mut Vec<String>) {
    if let Some((kind, items)) = list.take() {
        let tag = match kind {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        };
        html.push(format!("<{tag}>{}</{tag}>", items.concat()));
    }
}

/// Renders inline constructs in one line of already block-classified text.
fn render_inline(text: &str, refs: &HashMap<String, String>) -> String {
    let escaped = escape_html(text);
    let chars: Vec<char> = escaped.chars().collect();
    scan(&chars, refs)
}

/// Single left-to-right pass over escaped text. Every construct that fails
/// to find its closing delimiter degrades to the literal characters.
fn scan(chars: &[char], refs: &HashMap<String, String>) -> String {
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Inline code: contents stay literal (already escaped).
            '`' => match find(chars, i + 1, '`') {
                Some(end) if end > i + 1 => {
                    out.push_str("<code>");
                    out.extend(&chars[i + 1..end]);
                    out.push_str("</code>");
                    i = end + 1;
                }
                _ => {
                    out.push('`');
                    i += 1;
                }
            },

            // Image: ![alt](src) or ![alt][id]
            '!' if chars.get(i + 1) == Some(&'[') => {
                match parse_bracketed(chars, i + 1, refs) {
                    Some((alt, url, next)) => {
                        let alt: String = alt.iter().collect();
                        out.push_str(&format!("<img alt=\"{alt}\" src=\"{url}\" />"));
                        i = next;
                    }
                    None => {
                        out.push('!');
                        i += 1;
                    }
                }
            }

            // Link: [text](url) or [text][id]
            '[' => match parse_bracketed(chars, i, refs) {
                Some((text, url, next)) => {
                    out.push_str(&format!("<a href=\"{url}\">{}</a>", scan(text, refs)));
                    i = next;
                }
                None => {
                    out.push('[');
                    i += 1;
                }
            },

            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    match find_pair(chars, i + 2) {
                        Some(end) if end > i + 2 => {
                            out.push_str("<strong>");
                            out.push_str(&scan(&chars[i + 2..end], refs));
                            out.push_str("</strong>");
                            i = end + 2;
                            continue;
                        }
                        _ => {}
                    }
                } else if let Some(end) = find(chars, i + 1, '*') {
                    if end > i + 1 {
                        out.push_str("<em>");
                        out.push_str(&scan(&chars[i + 1..end], refs));
                        out.push_str("</em>");
                        i = end + 1;
                        continue;
                    }
                }
                out.push('*');
                i += 1;
            }

            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Parses `[inner](url)` or `[inner][id]` starting at the `[` at `start`.
///
/// Returns the inner text slice, the resolved URL, and the index just past
/// the construct. An unknown reference id falls back to the id itself.
fn parse_bracketed<'a>(
    chars: &'a [char],
    start: usize,
    refs: &HashMap<String, String>,
) -> Option<(&'a [char], String, usize)> {
    let close = find(chars, start + 1, ']')?;
    let inner = &chars[start + 1..close];
    if inner.is_empty() {
        return None;
    }

    match chars.get(close + 1) {
        Some('(') => {
            let end = find(chars, close + 2, ')')?;
            let url: String = chars[close + 2..end].iter().collect();
            Some((inner, url, end + 1))
        }
        Some('[') => {
            let end = find(chars, close + 2, ']')?;
            let id: String = chars[close + 2..end].iter().collect();
            let url = refs.get(id.trim()).cloned().unwrap_or(id);
            Some((inner, url, end + 1))
        }
        _ => None,
    }
}

fn find(chars: &[char], from: usize, target: char) -> Option<usize> {
    chars[from.min(chars.len())..]
        .iter()
        .position(|&c| c == target)
        .map(|p| from + p)
}

/// Finds the next `**` at or after `from`.
fn find_pair(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '*' {
            return Some(i);
        }
        i += 1;
    }
    None
}
