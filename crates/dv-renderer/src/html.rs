//! HTML output helpers shared by the code block and shell components.
//!
//! Icons are emitted as references into an SVG sprite supplied by the
//! theming layer (`<use href="#icon-NAME">`), so components only deal with
//! symbolic icon names.

use std::fmt::Write;

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Write an icon reference for a symbolic icon name.
pub fn write_icon(name: &str, out: &mut String) {
    let name = escape_html(name);
    write!(
        out,
        r##"<svg class="icon icon-{name}" width="16" height="16" aria-hidden="true"><use href="#icon-{name}"></use></svg>"##
    )
    .unwrap();
}
