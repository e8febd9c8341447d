//! In-memory database tree consumed by the exporter.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Field names with dedicated handling. Everything else is a custom field.
pub const KNOWN_FIELDS: [&str; 5] = ["Title", "UserName", "Password", "URL", "Notes"];

/// Whether `name` is one of the standard KeePass fields.
pub fn is_known_field(name: &str) -> bool {
    KNOWN_FIELDS.contains(&name)
}

/// A decrypted database ready for export.
#[derive(Debug)]
pub struct Database {
    /// Display name from the database metadata.
    pub name: Option<String>,
    pub root: Group,
    /// UUID of the recycle bin group, if any.
    pub recycle_bin: Option<String>,
    /// UUID of the group holding entry templates, if any.
    pub entry_templates: Option<String>,
    /// Shared binary pool that [`Binary::Ref`] indexes into.
    pub binaries: Vec<Vec<u8>>,
}

impl Database {
    /// Create a database around a root group.
    pub fn new(root: Group) -> Self {
        Self {
            name: None,
            root,
            recycle_bin: None,
            entry_templates: None,
            binaries: Vec::new(),
        }
    }

    /// Whether the group must be left out of exports.
    pub fn is_excluded(&self, group: &Group) -> bool {
        self.recycle_bin.as_deref() == Some(group.uuid.as_str())
            || self.entry_templates.as_deref() == Some(group.uuid.as_str())
    }

    /// Resolve attachment bytes, following references into the binary pool.
    pub fn resolve_binary<'a>(&'a self, binary: &'a Binary) -> Option<&'a [u8]> {
        match binary {
            Binary::Inline(bytes) => Some(bytes.as_slice()),
            Binary::Ref(index) => self.binaries.get(*index).map(Vec::as_slice),
        }
    }

    /// Find an entry by UUID anywhere in the tree.
    pub fn find_entry(&self, uuid: &str) -> Option<&Entry> {
        self.root.find_entry(uuid)
    }

    /// Collect every entry whose title matches exactly.
    pub fn find_entries_by_title(&self, title: &str) -> Vec<&Entry> {
        let mut found = Vec::new();
        self.root.collect_by_title(title, &mut found);
        found
    }
}

/// Represents a group (folder) in the database tree.
#[derive(Debug)]
pub struct Group {
    pub uuid: String,
    pub name: String,
    pub groups: Vec<Group>,
    pub entries: Vec<Entry>,
}

impl Group {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            groups: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    fn find_entry(&self, uuid: &str) -> Option<&Entry> {
        if let Some(entry) = self.entries.iter().find(|e| e.uuid == uuid) {
            return Some(entry);
        }
        self.groups.iter().find_map(|g| g.find_entry(uuid))
    }

    fn collect_by_title<'a>(&'a self, title: &str, found: &mut Vec<&'a Entry>) {
        found.extend(self.entries.iter().filter(|e| e.title() == title));
        for group in &self.groups {
            group.collect_by_title(title, found);
        }
    }
}

/// A stored field value. Protected values must be revealed explicitly.
#[derive(Debug)]
pub enum FieldValue {
    Plain(String),
    Protected(SecretString),
}

impl FieldValue {
    pub fn protected(value: impl Into<String>) -> Self {
        FieldValue::Protected(SecretString::from(value.into()))
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, FieldValue::Protected(_))
    }

    /// Plain text of the value, unmasking protected ones.
    pub fn reveal(&self) -> &str {
        match self {
            FieldValue::Plain(s) => s,
            FieldValue::Protected(secret) => secret.expose_secret(),
        }
    }
}

/// Represents a password entry.
#[derive(Debug)]
pub struct Entry {
    pub uuid: String,
    /// Fields in storage order.
    pub fields: Vec<(String, FieldValue)>,
    pub tags: Vec<String>,
    pub times: Times,
    pub attachments: Vec<Attachment>,
}

impl Entry {
    pub fn new(uuid: impl Into<String>, times: Times) -> Self {
        Self {
            uuid: uuid.into(),
            fields: Vec::new(),
            tags: Vec::new(),
            times,
            attachments: Vec::new(),
        }
    }

    /// Set a plain field, replacing an existing one of the same name.
    pub fn with_field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_value(name, FieldValue::Plain(value.into()))
    }

    /// Set a protected field, replacing an existing one of the same name.
    pub fn with_protected(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_value(name, FieldValue::protected(value))
    }

    pub fn with_value(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_attachment(mut self, name: impl Into<String>, binary: Binary) -> Self {
        self.attachments.push(Attachment {
            name: name.into(),
            binary,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Text of a field, or an empty string when it is missing.
    ///
    /// Protected values that reveal to nothing count as empty.
    pub fn field_text(&self, name: &str) -> &str {
        self.field(name).map(FieldValue::reveal).unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.field_text("Title")
    }

    /// Fields that are not part of [`KNOWN_FIELDS`], in storage order.
    pub fn custom_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .filter(|(name, _)| !is_known_field(name))
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Entry timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Times {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub expires: bool,
    pub expiry: Option<DateTime<Utc>>,
}

impl Times {
    /// Created and modified at the same instant, never expiring.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            created: time,
            modified: time,
            expires: false,
            expiry: None,
        }
    }
}

/// Represents a binary attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub binary: Binary,
}

/// Attachment contents, stored inline or in the database binary pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binary {
    Inline(Vec<u8>),
    Ref(usize),
}
