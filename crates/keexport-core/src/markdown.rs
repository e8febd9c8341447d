//! Markdown rendering for entry notes.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// True when the text is a single paragraph of plain text.
fn is_plain_text(markdown: &str) -> bool {
    let mut paragraphs = 0;
    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Paragraph) => paragraphs += 1,
            Event::End(TagEnd::Paragraph)
            | Event::Text(_)
            | Event::SoftBreak
            | Event::HardBreak => {}
            _ => return false,
        }
    }
    paragraphs <= 1
}

/// Convert markdown to sanitized HTML.
///
/// Plain text comes back unchanged, so callers can detect whether any
/// markup was produced by comparing with the input. A lone paragraph loses
/// its `<p>` wrapper; anything larger is wrapped in `div.markdown`.
pub fn markdown_to_html(markdown: &str) -> String {
    if markdown.trim().is_empty() || is_plain_text(markdown) {
        return markdown.to_string();
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, Parser::new_ext(markdown, options()));

    let cleaned = ammonia::clean(&html_output);
    let trimmed = cleaned.trim();

    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => format!("<div class=\"markdown\">{trimmed}</div>"),
    }
}
