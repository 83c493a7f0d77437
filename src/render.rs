// src/render.rs

use pulldown_cmark::{html, Event, Options, Parser};

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders markdown to HTML. `$..$` and `$$..$$` become math spans that a
/// KaTeX pass in the page typesets. Raw HTML in the source is emitted as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_MATH
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// A prose block wrapping rendered markdown.
pub fn article(markdown: &str) -> String {
    format!(
        "<article class=\"prose w-full max-w-full\">{}</article>",
        markdown_to_html(markdown)
    )
}

pub fn tag_chips(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            format!(
                "<span class=\"px-2 py-1 bg-zinc-300 text-zinc-800 text-xs rounded-md\">{}</span>",
                escape_html(tag)
            )
        })
        .collect()
}
