//! Public viewer: one published page as a standalone HTML document.

use super::{css_color, css_url, escape_html, html_document, safe_url};
use crate::blocks::{
    Block, BlockContent, HeadlineContent, ProjectContent, SkillsContent, SocialsContent,
    StackContent, TimelineContent,
};

pub const FOOTER_STAMP: &str = "Créé avec Open Day Builder · IUT Dijon MMI";
const PAGE_BACKGROUND: &str = "#cbd5e1";

const VIEWER_STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background-size:cover;background-position:center;background-attachment:fixed}\
main{max-width:56rem;margin:0 auto;padding:0 1rem 4rem}\
.back{display:block;max-width:56rem;margin:0 auto;padding:1rem;font:11px monospace;color:#64748b}\
.block{border-radius:1.5rem;margin-top:1.5rem;overflow:hidden}\
.block-body{padding:3.5rem}\
.hero,.glitch{text-align:center}\
.glitch h1{text-transform:uppercase}\
.glitch h1:hover{animation:glitch .3s infinite;color:#00ff41;text-shadow:2px 2px red}\
@keyframes glitch{0%{transform:translate(0)}25%{transform:translate(-2px,2px)}50%{transform:translate(2px,-2px)}100%{transform:translate(0)}}\
.terminal{font-family:monospace;background:rgba(0,0,0,.5);padding:1.25rem;border-radius:.75rem}\
.terminal pre::after{content:'\\258B';animation:blink 1s step-end infinite}\
@keyframes blink{50%{opacity:0}}\
.bio{white-space:pre-wrap}\
.skill{display:flex;align-items:center;gap:1rem}\
.skill-bar{flex:1;height:.5rem;border-radius:9999px;background:rgba(127,127,127,.2)}\
.skill-bar span{display:block;height:100%;border-radius:9999px;background:currentColor}\
.video iframe{width:100%;aspect-ratio:16/9;border:0}\
.socials a{color:inherit;margin:0 .5rem;font-weight:bold;text-transform:uppercase}\
footer{text-align:center;font:10px monospace;opacity:.5;text-transform:uppercase;padding-bottom:2.5rem}\
";

/// Resolved link targets of a socials block, in display order.
pub fn social_links(content: &SocialsContent) -> Vec<(&'static str, String)> {
    fn normalize(value: &str, prefix: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.starts_with("http") {
            Some(value.to_string())
        } else {
            Some(format!("{prefix}{value}"))
        }
    }

    [
        ("LinkedIn", &content.linkedin, "https://linkedin.com/in/"),
        ("GitHub", &content.github, "https://github.com/"),
        ("Portfolio", &content.portfolio, "https://"),
    ]
    .into_iter()
    .filter_map(|(label, value, prefix)| normalize(value, prefix).map(|href| (label, href)))
    .collect()
}

fn headline(class: &str, content: &HeadlineContent) -> String {
    let mut html = format!(
        r#"<div class="{class}"><h1>{}</h1>"#,
        escape_html(&content.title)
    );
    if !content.subtitle.is_empty() {
        html.push_str(&format!("<p>{}</p>", escape_html(&content.subtitle)));
    }
    html.push_str("</div>");
    html
}

fn project(content: &ProjectContent) -> String {
    let mut html = String::from(r#"<div class="project">"#);
    if let Some(src) = safe_url(&content.image) {
        let alt = if content.title.is_empty() {
            "Projet"
        } else {
            content.title.as_str()
        };
        html.push_str(&format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        ));
    }
    html.push_str(&format!(
        "<div><h2>{}</h2><p>{}</p></div></div>",
        escape_html(&content.title),
        escape_html(&content.desc)
    ));
    html
}

fn skills(content: &SkillsContent) -> String {
    let mut html = String::from(r#"<div class="skills"><h3>Compétences</h3>"#);
    for skill in &content.list {
        html.push_str(&format!(
            r#"<div class="skill"><strong>{}</strong><div class="skill-bar"><span style="width:{level}%"></span></div><small>{level}%</small></div>"#,
            escape_html(&skill.name),
            level = skill.level
        ));
    }
    html.push_str("</div>");
    html
}

fn socials(content: &SocialsContent) -> Option<String> {
    let links = social_links(content);
    if links.is_empty() {
        return None;
    }
    let anchors: String = links
        .iter()
        .filter_map(|(label, href)| {
            safe_url(href).map(|href| {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{label}</a>"#,
                    escape_html(href)
                )
            })
        })
        .collect();
    Some(format!(r#"<nav class="socials">{anchors}</nav>"#))
}

fn timeline(content: &TimelineContent) -> Option<String> {
    if content.items.is_empty() {
        return None;
    }
    let mut html = String::from(r#"<ol class="timeline">"#);
    for entry in &content.items {
        html.push_str(&format!(
            "<li><time>{}</time><h3>{}</h3><p>{}</p></li>",
            escape_html(&entry.date),
            escape_html(&entry.title),
            escape_html(&entry.text)
        ));
    }
    html.push_str("</ol>");
    Some(html)
}

fn stack(content: &StackContent) -> Option<String> {
    if content.items.is_empty() {
        return None;
    }
    let items: String = content
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    Some(format!(r#"<ul class="stack">{items}</ul>"#))
}

/// HTML of one block, `None` when it has nothing to show.
pub fn render_block(block: &Block) -> Option<String> {
    match block.content() {
        BlockContent::Hero(c) => Some(headline("hero", c)),
        BlockContent::Glitch(c) => Some(headline("glitch", c)),
        BlockContent::Bio(c) => Some(format!(r#"<p class="bio">{}</p>"#, escape_html(&c.text))),
        BlockContent::Terminal(c) => Some(format!(
            r#"<div class="terminal"><pre>{}</pre></div>"#,
            escape_html(&c.text)
        )),
        BlockContent::Code(c) => Some(format!(
            r#"<pre class="code"><code>{}</code></pre>"#,
            escape_html(&c.code)
        )),
        BlockContent::Project(c) => Some(project(c)),
        BlockContent::Skills(c) => Some(skills(c)),
        BlockContent::Video(c) => safe_url(&c.url).map(|url| {
            format!(
                r#"<div class="video"><iframe src="{}" title="Vidéo" allowfullscreen></iframe></div>"#,
                escape_html(url)
            )
        }),
        BlockContent::Socials(c) => socials(c),
        BlockContent::Clicker(c) => Some(format!(
            r#"<details class="clicker"><summary>{}</summary><p>{}</p></details>"#,
            escape_html(&c.label),
            escape_html(&c.message)
        )),
        BlockContent::Timeline(c) => timeline(c),
        BlockContent::Stack(c) => stack(c),
        BlockContent::Other { tag, .. } => {
            tracing::debug!(block_type = %tag, "no viewer for block type");
            None
        }
    }
}

/// Standalone page: each block in a section coloured by its style.
pub fn render_page(name: &str, blocks: &[Block], background_image: Option<&str>) -> String {
    let mut body = String::from(r#"<a class="back" href="/forum">← retour au forum</a><main>"#);
    for block in blocks {
        let Some(inner) = render_block(block) else {
            continue;
        };
        body.push_str(&format!(
            r#"<section class="block block-{}" style="background-color:{};color:{}"><div class="block-body">{}</div></section>"#,
            escape_html(block.tag()),
            css_color(&block.style.background, "transparent"),
            css_color(&block.style.foreground, "inherit"),
            inner
        ));
    }
    body.push_str(&format!("</main><footer>{FOOTER_STAMP}</footer>"));

    let mut body_style = format!("background-color:{PAGE_BACKGROUND}");
    if let Some(url) = background_image.and_then(css_url) {
        body_style.push_str(&format!(";background-image:url(&quot;{}&quot;)", escape_html(url)));
    }

    html_document(name, VIEWER_STYLE, &body_style, &body)
}

/// Page shown for an unknown or malformed id.
pub fn render_not_found(id: &str) -> String {
    let body = format!(
        r#"<main style="text-align:center;padding-top:20vh;color:#f8fafc"><p>IUT Dijon · MMI · Open Day</p><h1>404</h1><p>La page <code>{}</code> n'existe pas ou a été supprimée.</p><a href="/forum" style="color:#60a5fa">← Retour au forum</a></main>"#,
        escape_html(id)
    );
    html_document("Page introuvable", VIEWER_STYLE, "background-color:#020617", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockKind, BlockStyle, Skill, VideoContent};

    fn block(content: BlockContent) -> Block {
        Block::with_content("b1", content, BlockStyle::new("#000000", "#22c55e"))
    }

    #[test]
    fn test_social_links_normalizes_handles() {
        let links = social_links(&SocialsContent {
            linkedin: "marie-curie".to_string(),
            github: "https://github.com/mcurie".to_string(),
            portfolio: "curie.dev".to_string(),
        });
        assert_eq!(
            links,
            vec![
                ("LinkedIn", "https://linkedin.com/in/marie-curie".to_string()),
                ("GitHub", "https://github.com/mcurie".to_string()),
                ("Portfolio", "https://curie.dev".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_socials_and_video_render_nothing() {
        assert!(render_block(&block(BlockContent::Socials(SocialsContent::default()))).is_none());
        assert!(render_block(&block(BlockContent::Video(VideoContent::default()))).is_none());
        assert!(render_block(&Block::from_tag("carousel")).is_none());
    }

    #[test]
    fn test_video_with_url_renders_iframe() {
        let html = render_block(&block(BlockContent::Video(VideoContent {
            url: "https://www.youtube.com/embed/abc".to_string(),
        })))
        .unwrap();
        assert!(html.contains(r#"<iframe src="https://www.youtube.com/embed/abc""#));
    }

    #[test]
    fn test_skills_render_width_bars() {
        let html = render_block(&block(BlockContent::Skills(SkillsContent {
            list: vec![Skill {
                name: "Rust".to_string(),
                level: 75,
            }],
        })))
        .unwrap();
        assert!(html.contains("Compétences"));
        assert!(html.contains("width:75%"));
    }

    #[test]
    fn test_every_kind_default_renders() {
        for kind in BlockKind::ALL {
            let rendered = render_block(&Block::new(kind));
            match kind {
                BlockKind::Video | BlockKind::Socials => assert!(rendered.is_none(), "{kind}"),
                _ => assert!(rendered.is_some(), "{kind}"),
            }
        }
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_block(&block(BlockContent::Bio(crate::blocks::TextContent {
            text: "<script>alert(1)</script>".to_string(),
        })))
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_project_image_rejects_script_urls() {
        let html = render_block(&block(BlockContent::Project(ProjectContent {
            title: "Robot".to_string(),
            desc: String::new(),
            image: "javascript:alert(1)".to_string(),
        })))
        .unwrap();
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_page_layout() {
        let blocks = vec![Block::new(BlockKind::Hero), Block::new(BlockKind::Terminal)];
        let html = render_page("Marie Curie", &blocks, Some("data:image/png;base64,iVBORw0KGgo="));
        assert!(html.contains("<title>Marie Curie</title>"));
        assert!(html.contains("Mon Portfolio"));
        assert!(html.contains("background-color:#000000;color:#22c55e"));
        assert!(html.contains("background-image:url(&quot;data:image/png;base64,iVBORw0KGgo=&quot;)"));
        assert!(html.contains(r#"href="/forum""#));
        assert!(html.contains(FOOTER_STAMP));
        assert!(html.find("Mon Portfolio") < html.find("Bonjour"));
    }

    #[test]
    fn test_render_not_found() {
        let html = render_not_found("<b>42</b>");
        assert!(html.contains("404"));
        assert!(html.contains("&lt;b&gt;42&lt;/b&gt;"));
        assert!(html.contains("← Retour au forum"));
    }
}
