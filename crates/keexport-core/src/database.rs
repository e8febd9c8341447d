//! KeePass database loading.

use crate::models::{Binary, Database, Entry, FieldValue, Group, Times};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use keepass::db::{AttachmentId, AttachmentRef, EntryRef, GroupRef, Value};
use keepass::DatabaseKey;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::path::Path;

/// Wrapper around an unlocked KeePass database.
pub struct KeepassDatabase {
    db: keepass::Database,
}

impl KeepassDatabase {
    /// Open and unlock a KeePass database.
    pub fn unlock(
        path: impl AsRef<Path>,
        password: &str,
        keyfile: Option<&Path>,
    ) -> Result<Self> {
        let path = path.as_ref();

        let mut key = DatabaseKey::new().with_password(password);
        if let Some(keyfile) = keyfile {
            let mut file = std::fs::File::open(keyfile)
                .with_context(|| format!("Failed to open key file: {}", keyfile.display()))?;
            key = key
                .with_keyfile(&mut file)
                .with_context(|| format!("Failed to read key file: {}", keyfile.display()))?;
        }

        let mut file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open database file: {}", path.display()))?;
        let db = keepass::Database::open(&mut file, key)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        tracing::info!("Unlocked database {}", path.display());
        Ok(Self { db })
    }

    /// Wrap a database that is already open.
    pub fn from_database(db: keepass::Database) -> Self {
        Self { db }
    }

    /// Convert the unlocked database into the export model.
    ///
    /// Attachment bytes are collected once into the binary pool and entries
    /// point into it, so an attachment shared by several entries is stored
    /// a single time.
    pub fn to_model(&self) -> Database {
        let meta = &self.db.meta;
        let mut pool = BinaryPool::default();
        let root = convert_group(&self.db.root(), &mut pool);

        tracing::debug!("Collected {} attachment(s)", pool.binaries.len());
        Database {
            name: meta.database_name.clone().filter(|n| !n.is_empty()),
            root,
            recycle_bin: meta.recyclebin_uuid.map(|u| u.to_string()),
            entry_templates: meta.entry_templates_group.map(|u| u.to_string()),
            binaries: pool.binaries,
        }
    }
}

/// Attachment data gathered while walking the tree.
#[derive(Default)]
struct BinaryPool {
    binaries: Vec<Vec<u8>>,
    index: HashMap<AttachmentId, usize>,
}

impl BinaryPool {
    fn intern(&mut self, attachment: &AttachmentRef<'_>) -> usize {
        let binaries = &mut self.binaries;
        *self.index.entry(attachment.id()).or_insert_with(|| {
            binaries.push(attachment.data.get().clone());
            binaries.len() - 1
        })
    }
}

/// Convert a keepass group to our Group model.
fn convert_group(kg: &GroupRef<'_>, pool: &mut BinaryPool) -> Group {
    let mut group = Group::new(kg.id().to_string(), kg.name.clone());
    for entry in kg.entries() {
        group.entries.push(convert_entry(&entry, pool));
    }
    for child in kg.groups() {
        group.groups.push(convert_group(&child, pool));
    }
    group
}

/// Convert a keepass entry to our Entry model.
fn convert_entry(ke: &EntryRef<'_>, pool: &mut BinaryPool) -> Entry {
    let id = ke.id().to_string();
    let times = Times {
        created: timestamp(ke.times.creation, "creation", &id),
        modified: timestamp(ke.times.last_modification, "modification", &id),
        expires: ke.times.expires.unwrap_or(false),
        expiry: ke.times.expiry.map(|t| t.and_utc()),
    };
    let mut entry = Entry::new(id, times);
    entry.tags = ke.tags.clone();

    // HashMap order differs between loads, keep it stable by name.
    let mut names: Vec<&String> = ke.fields.keys().collect();
    names.sort();

    for name in names {
        let value = match &ke.fields[name] {
            Value::Unprotected(s) => FieldValue::Plain(s.clone()),
            Value::Protected(secret) => FieldValue::protected(secret.expose_secret().as_str()),
        };
        entry = entry.with_value(name.as_str(), value);
    }

    let mut attachments: Vec<_> = ke.attachments_named().collect();
    attachments.sort_by(|a, b| a.0.cmp(b.0));
    for (name, attachment) in attachments {
        let index = pool.intern(&attachment);
        entry = entry.with_attachment(name, Binary::Ref(index));
    }

    entry
}

fn timestamp(time: Option<NaiveDateTime>, which: &str, id: &str) -> DateTime<Utc> {
    match time {
        Some(t) => t.and_utc(),
        None => {
            tracing::debug!("Entry {} has no {} time", id, which);
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}
