//! Module rendering.
//!
//! `ModuleRenderer` is the seam to whatever component system draws the
//! modules. `HtmlModuleRenderer` is the built-in one: a `<section>` per
//! module carrying its type and key, with common text fields filled in.

use serde_json::Value;

use crate::page::document::{Module, PageDocument};

/// Turns an ordered module list into HTML.
pub trait ModuleRenderer: Send + Sync {
    /// Render `modules` in the order given. `document` is the whole page.
    fn render(&self, modules: &[Module], document: &PageDocument) -> String;
}

/// Plain semantic HTML, one section per module.
#[derive(Debug, Clone, Default)]
pub struct HtmlModuleRenderer;

impl ModuleRenderer for HtmlModuleRenderer {
    fn render(&self, modules: &[Module], _document: &PageDocument) -> String {
        let mut html = String::new();
        for module in modules {
            html.push_str(&render_module(module));
        }
        html
    }
}

fn render_module(module: &Module) -> String {
    let kind = escape_html(&module.kind);
    let mut html = match &module.key {
        Some(key) => format!(
            "<section class=\"module module-{kind}\" data-module=\"{kind}\" data-key=\"{}\">",
            escape_html(key)
        ),
        None => format!("<section class=\"module module-{kind}\" data-module=\"{kind}\">"),
    };

    if let Some(heading) = module.str_field("title").or_else(|| module.str_field("heading")) {
        html.push_str(&format!("<h2>{}</h2>", escape_html(heading)));
    }
    if let Some(text) = module.str_field("text").or_else(|| module.str_field("description")) {
        html.push_str(&format!("<p>{}</p>", escape_html(text)));
    }
    for field in ["intro", "content"] {
        if let Some(blocks) = module.fields.get(field).and_then(Value::as_array) {
            html.push_str(&render_portable_text(blocks));
        }
    }
    if let Some(ctas) = module.fields.get("ctas").and_then(Value::as_array) {
        html.push_str(&render_ctas(ctas));
    }

    html.push_str("</section>");
    html
}

/// Paragraphs from Portable Text blocks (`{_type: "block", children: [{text}]}`).
fn render_portable_text(blocks: &[Value]) -> String {
    let mut html = String::new();
    for block in blocks {
        if block.get("_type").and_then(Value::as_str) != Some("block") {
            continue;
        }
        let text: String = block
            .get("children")
            .and_then(Value::as_array)
            .map(|children| {
                children
                    .iter()
                    .filter_map(|span| span.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        let tag = match block.get("style").and_then(Value::as_str) {
            Some(style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) => style,
            Some("blockquote") => "blockquote",
            _ => "p",
        };
        html.push_str(&format!("<{tag}>{}</{tag}>", escape_html(&text)));
    }
    html
}

/// Call-to-action links. Internal links point at the target's slug.
fn render_ctas(ctas: &[Value]) -> String {
    let mut html = String::new();
    for cta in ctas {
        let Some(link) = cta.get("link") else {
            continue;
        };
        let label = link
            .get("label")
            .and_then(Value::as_str)
            .or_else(|| cta.get("text").and_then(Value::as_str))
            .unwrap_or("");
        let href = link
            .get("external")
            .and_then(Value::as_str)
            .filter(|url| is_safe_url(url))
            .map(str::to_owned)
            .or_else(|| {
                link.get("internal")
                    .and_then(|internal| internal.pointer("/metadata/slug/current"))
                    .and_then(Value::as_str)
                    .map(|slug| if slug == "index" { "/".to_string() } else { format!("/{slug}") })
            });
        if let Some(href) = href {
            html.push_str(&format!(
                "<a class=\"cta\" href=\"{}\">{}</a>",
                escape_html(&href),
                escape_html(label)
            ));
        }
    }
    html
}

fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    trimmed.starts_with("https://") || trimmed.starts_with("http://") || trimmed.starts_with('/')
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
