//! Public gallery of published pages.

use chrono::{DateTime, Datelike, Utc};

use super::{css_color, escape_html, html_document};
use crate::routes::pages::PageSummary;

pub const CARD_BACKGROUND: &str = "#0f172a";
pub const CARD_FOREGROUND: &str = "#f1f5f9";

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const GALLERY_STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif}\
header{display:flex;align-items:center;justify-content:space-between;gap:1rem;padding:1rem 1.25rem;border-bottom:1px solid #1e293b}\
header input{padding:.5rem;background:#0f172a;border:1px solid #1e293b;border-radius:.5rem;color:#e2e8f0}\
.count{font:11px monospace;color:#475569}\
.intro{max-width:72rem;margin:0 auto;padding:4rem 1.25rem}\
.grid{max-width:72rem;margin:0 auto;padding:0 1.25rem 6rem;display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.card{display:flex;flex-direction:column;align-items:center;justify-content:center;aspect-ratio:4/3;border-radius:1rem;text-decoration:none;text-align:center;padding:0 1.5rem}\
.card h3{text-transform:uppercase;margin:0 0 .5rem}\
.card p{font:11px monospace;opacity:.6;margin:.25rem 0}\
.empty{grid-column:1/-1;text-align:center;color:#64748b;padding:6rem 0}\
footer{border-top:1px solid #1e293b;padding:2rem 1.25rem;font:11px monospace;color:#475569}\
";

/// Day and French month name, e.g. "19 octobre".
pub fn french_day_month(date: &DateTime<Utc>) -> String {
    format!("{} {}", date.day(), MONTHS[date.month0() as usize])
}

/// "1 création", "3 créations"
pub fn count_label(count: usize) -> String {
    format!("{count} création{}", if count == 1 { "" } else { "s" })
}

/// Case-insensitive substring search over name and preview title.
pub fn filter_cards<'a>(pages: &'a [PageSummary], query: &str) -> Vec<&'a PageSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return pages.iter().collect();
    }
    pages
        .iter()
        .filter(|page| {
            page.name.to_lowercase().contains(&query)
                || page
                    .preview
                    .preview_title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn render_card(page: &PageSummary) -> String {
    let background = css_color(
        page.preview.preview_background.as_deref().unwrap_or_default(),
        CARD_BACKGROUND,
    );
    let foreground = css_color(
        page.preview.preview_color.as_deref().unwrap_or_default(),
        CARD_FOREGROUND,
    );
    let title = page
        .preview
        .preview_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(page.name.as_str());

    format!(
        r#"<a class="card" href="/view/{id}" style="background-color:{background};color:{foreground}" data-tag="{tag}"><h3>{title}</h3><p>{name}</p><p>{date}</p></a>"#,
        id = page.id,
        tag = page.tag,
        title = escape_html(title),
        name = escape_html(&page.name),
        date = french_day_month(&page.created_at),
    )
}

/// Gallery document for the pages matching `query`.
pub fn render_gallery(pages: &[PageSummary], query: &str) -> String {
    let visible = filter_cards(pages, query);

    let mut body = format!(
        r#"<header><strong>IUT Dijon | MMI · JPO 2026</strong><form method="get" action="/forum"><input type="search" name="q" value="{}" placeholder="Rechercher..."></form><span class="count">{}</span></header>"#,
        escape_html(query),
        count_label(visible.len())
    );
    body.push_str(
        r#"<section class="intro"><h1>JPO MMI.</h1><p>Retrouvez ici les sites créés en direct par les visiteurs et futurs étudiants.</p></section><main class="grid">"#,
    );
    if visible.is_empty() {
        body.push_str(
            r#"<div class="empty"><p>Aucune création pour le moment</p><p>Soyez le premier à publier votre page !</p></div>"#,
        );
    } else {
        for page in visible {
            body.push_str(&render_card(page));
        }
    }
    body.push_str("</main><footer>© 2026 IUT Dijon · Département MMI</footer>");

    html_document(
        "JPO MMI · Galerie",
        GALLERY_STYLE,
        "background-color:#020617;color:#f1f5f9",
        &body,
    )
}
