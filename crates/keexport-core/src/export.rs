//! HTML export of a database tree.
//!
//! Groups are walked depth-first: a group's own entries come first, then
//! each child group in order. The recycle bin and the entry template group
//! are skipped together with everything below them.

use crate::error::ExportError;
use crate::format::{cap_first, DateFormatter};
use crate::locale::{Label, Labels};
use crate::markdown::markdown_to_html;
use crate::models::{Database, Entry, Group};
use crate::templates::{
    AttachmentView, DocumentView, EntryView, FieldView, HtmlTemplates, RowLabels,
    Templates,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

const PATH_SEPARATOR: &str = " / ";
const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// A standard field with a localized label.
struct MappedField {
    name: &'static str,
    role: Label,
    protect: bool,
    markdown: bool,
}

/// Standard fields in display order. "Title" is rendered as the heading.
const FIELD_MAPPING: [MappedField; 4] = [
    MappedField {
        name: "UserName",
        role: Label::User,
        protect: false,
        markdown: false,
    },
    MappedField {
        name: "Password",
        role: Label::Password,
        protect: true,
        markdown: false,
    },
    MappedField {
        name: "URL",
        role: Label::Website,
        protect: false,
        markdown: false,
    },
    MappedField {
        name: "Notes",
        role: Label::Notes,
        protect: false,
        markdown: true,
    },
];

/// Options for a full database export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Document title.
    pub name: String,
}

/// Identity of the exporting application, shown in the document footer.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub link: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "keexport".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            link: env!("CARGO_PKG_HOMEPAGE").to_string(),
        }
    }
}

/// Renders databases and single entries to HTML.
pub struct HtmlExporter {
    templates: Box<dyn Templates>,
    labels: Labels,
    dates: DateFormatter,
    use_markdown: bool,
    app: AppInfo,
}

impl HtmlExporter {
    pub fn new(labels: Labels, dates: DateFormatter, use_markdown: bool) -> Self {
        Self {
            templates: Box::new(HtmlTemplates),
            labels,
            dates,
            use_markdown,
            app: AppInfo::default(),
        }
    }

    /// Replace the built-in HTML templates.
    pub fn with_templates(mut self, templates: impl Templates + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn with_app_info(mut self, app: AppInfo) -> Self {
        self.app = app;
        self
    }

    /// Render the whole database as one HTML document.
    pub fn render_database(
        &self,
        db: &Database,
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let mut parents = Vec::new();
        let mut fragments = Vec::new();
        self.walk_group(db, &db.root, &mut parents, &mut fragments)?;

        tracing::info!("Rendered {} entries for '{}'", fragments.len(), options.name);

        self.templates.render_document(&DocumentView {
            name: options.name.clone(),
            date: self.dates.now(),
            app_name: self.app.name.clone(),
            app_version: self.app.version.clone(),
            app_link: self.app.link.clone(),
            exported_on: self.labels.exported_on.clone(),
            by: self.labels.by.clone(),
            content: fragments.join("\n"),
        })
    }

    /// Render a single entry without its group path.
    pub fn render_entry(&self, db: &Database, entry: &Entry) -> Result<String, ExportError> {
        self.walk_entry(db, entry, &[])
    }

    fn walk_group<'a>(
        &self,
        db: &Database,
        group: &'a Group,
        parents: &mut Vec<&'a str>,
        fragments: &mut Vec<String>,
    ) -> Result<(), ExportError> {
        if db.is_excluded(group) {
            tracing::debug!("Skipping excluded group {}", group.uuid);
            return Ok(());
        }

        parents.push(&group.name);
        for entry in &group.entries {
            fragments.push(self.walk_entry(db, entry, parents)?);
        }
        for child in &group.groups {
            self.walk_group(db, child, parents, fragments)?;
        }
        parents.pop();
        Ok(())
    }

    fn walk_entry(
        &self,
        db: &Database,
        entry: &Entry,
        parents: &[&str],
    ) -> Result<String, ExportError> {
        let view = EntryView {
            path: parents.join(PATH_SEPARATOR),
            title: entry.title().to_string(),
            fields: self.entry_fields(entry),
            tags: entry.tags.join(", "),
            created: self.dates.format(&entry.times.created),
            modified: self.dates.format(&entry.times.modified),
            expires: match (entry.times.expires, &entry.times.expiry) {
                (true, Some(expiry)) => Some(self.dates.format(expiry)),
                _ => None,
            },
            attachments: attachments(db, entry),
            labels: RowLabels {
                tags: cap_first(&self.labels.tags),
                created: cap_first(&self.labels.created),
                modified: cap_first(&self.labels.modified),
                expires: cap_first(&self.labels.expires),
            },
        };
        self.templates.render_entry(&view)
    }

    fn entry_fields(&self, entry: &Entry) -> Vec<FieldView> {
        let mut fields = Vec::new();

        for mapped in &FIELD_MAPPING {
            let raw = entry.field_text(mapped.name);
            if raw.is_empty() {
                continue;
            }

            let mut value = raw.to_string();
            let mut html = false;
            if mapped.markdown && self.use_markdown {
                let converted = markdown_to_html(raw);
                if converted != raw {
                    value = converted;
                    html = true;
                }
            }

            let stored_protected = entry.field(mapped.name).is_some_and(|v| v.is_protected());
            fields.push(FieldView {
                title: cap_first(self.labels.get(mapped.role)),
                value,
                protect: mapped.protect || stored_protected,
                html,
            });
        }

        for (name, value) in entry.custom_fields() {
            let text = value.reveal();
            if text.is_empty() {
                continue;
            }
            fields.push(FieldView {
                title: name.to_string(),
                value: text.to_string(),
                protect: value.is_protected(),
                html: false,
            });
        }

        fields
    }
}

/// Inline every resolvable attachment as a data URI.
fn attachments(db: &Database, entry: &Entry) -> Vec<AttachmentView> {
    entry
        .attachments
        .iter()
        .filter_map(|att| {
            let bytes = db.resolve_binary(&att.binary).filter(|b| !b.is_empty());
            match bytes {
                Some(bytes) if !att.name.is_empty() => Some(AttachmentView {
                    name: att.name.clone(),
                    data: format!("{DATA_URI_PREFIX}{}", STANDARD.encode(bytes)),
                }),
                _ => {
                    tracing::debug!("Dropping empty attachment '{}' on {}", att.name, entry.uuid);
                    None
                }
            }
        })
        .collect()
}

/// Find an entry by UUID, falling back to a unique exact title match.
pub fn select_entry<'a>(db: &'a Database, query: &str) -> Result<&'a Entry, ExportError> {
    if let Some(entry) = db.find_entry(query) {
        return Ok(entry);
    }

    let mut matches = db.find_entries_by_title(query);
    match matches.len() {
        0 => Err(ExportError::EntryNotFound(query.to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(ExportError::AmbiguousEntry {
            title: query.to_string(),
            count,
        }),
    }
}
