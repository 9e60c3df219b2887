//! Presentational forms of pages: public viewer HTML, gallery cards and
//! editor form descriptors.

pub mod editor;
pub mod gallery;
pub mod viewer;

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// URL usable in `href`/`src`: http(s), root-relative or an inline image.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.get(..11).unwrap_or(url).to_ascii_lowercase();
    let allowed = lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:image/")
        || (url.starts_with('/') && !url.starts_with("//"));
    allowed.then_some(url)
}

/// URL that can sit inside a CSS `url("...")` in a style attribute.
pub fn css_url(url: &str) -> Option<&str> {
    safe_url(url).filter(|u| {
        !u.chars()
            .any(|c| matches!(c, '"' | '\'' | '(' | ')' | '\\' | '<' | '>') || c.is_whitespace())
    })
}

/// Colour value for a style attribute, or `fallback` when empty or unsafe.
pub fn css_color<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    let safe = !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'));
    if safe {
        value
    } else {
        fallback
    }
}

/// Full HTML document around a rendered body.
pub(crate) fn html_document(title: &str, style: &str, body_style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body style=\"{}\">\n{}\n</body>\n</html>\n",
        escape_html(title),
        style,
        body_style,
        body
    )
}
