//! Document and entry templates.
//!
//! The exporter assembles plain view records and hands them to a
//! [`Templates`] implementation. [`HtmlTemplates`] produces a
//! self-contained HTML page with inline styles.

use crate::error::ExportError;
use std::fmt::Write;

/// One row of an entry's field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub title: String,
    pub value: String,
    /// Sensitive value, masked until revealed.
    pub protect: bool,
    /// `value` is already markup and must not be escaped.
    pub html: bool,
}

/// A downloadable attachment encoded as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub name: String,
    pub data: String,
}

/// Titles of the fixed rows below an entry's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    pub tags: String,
    pub created: String,
    pub modified: String,
    pub expires: String,
}

/// Everything the entry template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// Ancestor group names joined with " / ". Empty for single-entry exports.
    pub path: String,
    pub title: String,
    pub fields: Vec<FieldView>,
    pub tags: String,
    pub created: String,
    pub modified: String,
    pub expires: Option<String>,
    pub attachments: Vec<AttachmentView>,
    pub labels: RowLabels,
}

/// Everything the outer document template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub name: String,
    pub date: String,
    pub app_name: String,
    pub app_version: String,
    pub app_link: String,
    /// Footer text before the date and before the application link.
    pub exported_on: String,
    pub by: String,
    /// Pre-rendered entry fragments.
    pub content: String,
}

/// Renders view records into text.
pub trait Templates {
    fn render_document(&self, view: &DocumentView) -> Result<String, ExportError>;
    fn render_entry(&self, view: &EntryView) -> Result<String, ExportError>;
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em auto; max-width: 60em; color: #222; }
h1 { border-bottom: 2px solid #444; padding-bottom: .3em; }
.entry { border: 1px solid #ddd; border-radius: 4px; margin: 1em 0; padding: 0 1em 1em; }
.path { color: #777; font-size: .85em; padding-top: .8em; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #eee; padding: .4em; text-align: left; vertical-align: top; }
th { width: 12em; font-weight: normal; color: #555; }
td.plain { white-space: pre-wrap; }
.protected { filter: blur(4px); cursor: pointer; }
.protected:hover { filter: none; }
.attachments a { margin-right: 1em; }
footer { color: #777; font-size: .85em; margin-top: 2em; }
";

/// Built-in HTML templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTemplates;

impl HtmlTemplates {
    fn write_row(out: &mut String, title: &str, value: &str) -> std::fmt::Result {
        writeln!(
            out,
            "<tr><th>{}</th><td class=\"plain\">{}</td></tr>",
            escape_html(title),
            escape_html(value)
        )
    }

    fn write_field(out: &mut String, field: &FieldView) -> std::fmt::Result {
        let value = if field.html {
            field.value.clone()
        } else {
            escape_html(&field.value)
        };
        let value = if field.protect {
            format!("<span class=\"protected\">{value}</span>")
        } else {
            value
        };
        let class = if field.html { "markdown" } else { "plain" };
        writeln!(
            out,
            "<tr><th>{}</th><td class=\"{class}\">{value}</td></tr>",
            escape_html(&field.title)
        )
    }
}

impl Templates for HtmlTemplates {
    fn render_document(&self, view: &DocumentView) -> Result<String, ExportError> {
        let name = escape_html(&view.name);
        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{name}</title>")?;
        writeln!(out, "<style>\n{STYLE}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{name}</h1>")?;
        writeln!(out, "{}", view.content)?;
        writeln!(
            out,
            "<footer>{} {} {} <a href=\"{}\">{}</a> v{}</footer>",
            escape_html(&view.exported_on),
            escape_html(&view.date),
            escape_html(&view.by),
            escape_html(&view.app_link),
            escape_html(&view.app_name),
            escape_html(&view.app_version)
        )?;
        writeln!(out, "</body>")?;
        write!(out, "</html>")?;
        Ok(out)
    }

    fn render_entry(&self, view: &EntryView) -> Result<String, ExportError> {
        let mut out = String::new();
        writeln!(out, "<section class=\"entry\">")?;
        if !view.path.is_empty() {
            writeln!(out, "<div class=\"path\">{}</div>", escape_html(&view.path))?;
        }
        writeln!(out, "<h2>{}</h2>", escape_html(&view.title))?;
        writeln!(out, "<table>")?;
        for field in &view.fields {
            Self::write_field(&mut out, field)?;
        }
        if !view.tags.is_empty() {
            Self::write_row(&mut out, &view.labels.tags, &view.tags)?;
        }
        Self::write_row(&mut out, &view.labels.created, &view.created)?;
        Self::write_row(&mut out, &view.labels.modified, &view.modified)?;
        if let Some(expires) = &view.expires {
            Self::write_row(&mut out, &view.labels.expires, expires)?;
        }
        writeln!(out, "</table>")?;
        if !view.attachments.is_empty() {
            write!(out, "<div class=\"attachments\">")?;
            for att in &view.attachments {
                let name = escape_html(&att.name);
                write!(out, "<a download=\"{name}\" href=\"{}\">{name}</a>", att.data)?;
            }
            writeln!(out, "</div>")?;
        }
        write!(out, "</section>")?;
        Ok(out)
    }
}
