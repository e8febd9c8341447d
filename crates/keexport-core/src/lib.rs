//! Core models and HTML export for keexport.
//!
//! This crate loads KeePass databases into a read-only tree and renders
//! that tree, or a single entry, as a self-contained HTML document.

pub mod database;
pub mod error;
pub mod export;
pub mod format;
pub mod locale;
pub mod markdown;
pub mod models;
pub mod templates;

pub use database::KeepassDatabase;
pub use error::ExportError;
pub use export::{select_entry, AppInfo, ExportOptions, HtmlExporter};
pub use format::DateFormatter;
pub use locale::{Label, Labels};
pub use models::{Attachment, Binary, Database, Entry, FieldValue, Group, Times};
pub use templates::{HtmlTemplates, Templates};
