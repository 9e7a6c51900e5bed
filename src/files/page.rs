//! Shared HTML page shell and escaping helpers for the renderers.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a file name is placed in an href. `%` is
/// included so encoding round-trips through the parser's decode exactly.
const HREF_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&')
    .add(b'\'');

/// Escapes text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes one path segment for use in an href.
pub fn encode_href_segment(segment: &str) -> String {
    utf8_percent_encode(segment, HREF_SEGMENT).to_string()
}

/// Wraps a rendered body fragment in a complete HTML document.
///
/// The shell is deliberately self-contained: inline CSS only, no external
/// assets, so rendered pages work no matter which subtree is served.
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ margin: 0 auto; max-width: 960px; padding: 24px 16px;
  font-family: ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, Arial, sans-serif;
  background: #fafafa; color: #212121; line-height: 1.5; }}
a {{ color: #1e88e5; text-decoration: none; }}
a:hover {{ text-decoration: underline; }}
ul.listing {{ list-style: none; padding: 0; }}
ul.listing li {{ padding: 4px 0; border-bottom: 1px solid #e0e0e0; }}
pre code {{ display: block; padding: 1em; overflow-x: auto; background: #ffffff;
  border: 1px solid #e0e0e0; border-radius: 8px;
  font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; }}
code {{ background: #efefef; border-radius: 4px; padding: 0 3px; }}
blockquote {{ margin: 0; padding-left: 12px; border-left: 3px solid #e0e0e0; color: #616161; }}
hr {{ border: 0; border-top: 1px solid #e0e0e0; }}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = title,
        body = body,
    )
}
