//! Directory listing rendering.
//!
//! Produces a complete HTML page for a resolved directory. Entry order is
//! whatever the resolver produced; this module never re-sorts, so the page
//! is a deterministic function of the resolver's output.

use crate::files::page::{encode_href_segment, escape_html, render_page};
use crate::files::resolve::Entry;

/// Renders a directory listing page.
///
/// Directory URLs always end in `/` (the dispatcher redirects otherwise),
/// so entry hrefs are relative child segments and the parent link is
/// simply `../`. Names are HTML-escaped in link text and percent-encoded
/// in hrefs, so a maliciously named file cannot inject markup and
/// following any link resolves back to that entry's real location.
pub fn render(request_path: &str, entries: &[Entry]) -> String {
    let title = format!("Index of {}", escape_html(request_path));

    let mut items = String::new();
    if request_path != "/" {
        items.push_str("<li><a href=\"../\">..</a></li>\n");
    }

    for entry in entries {
        let mut href = encode_href_segment(&entry.name);
        let mut name = escape_html(&entry.name);
        if entry.is_dir {
            href.push('/');
            name.push('/');
        }
        items.push_str(&format!("<li><a href=\"{href}\">{name}</a></li>\n"));
    }

    let body = format!("<h1>{title}</h1>\n<ul class=\"listing\">\n{items}</ul>");
    render_page(&title, &body)
}
