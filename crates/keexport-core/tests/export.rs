use chrono::{FixedOffset, Locale, TimeZone, Utc};
use keexport_core::templates::{DocumentView, EntryView};
use keexport_core::{
    AppInfo, Binary, Database, DateFormatter, Entry, ExportError, ExportOptions, Group,
    HtmlExporter, Labels, Templates, Times,
};

fn times() -> Times {
    Times::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
}

fn exporter(use_markdown: bool) -> HtmlExporter {
    let dates = DateFormatter::new(Locale::en_US, FixedOffset::east_opt(0).unwrap());
    HtmlExporter::new(Labels::default(), dates, use_markdown).with_app_info(AppInfo {
        name: "keexport".into(),
        version: "9.9.9".into(),
        link: "https://example.com/keexport".into(),
    })
}

fn entry(uuid: &str, title: &str) -> Entry {
    Entry::new(uuid, times()).with_field("Title", title)
}

/// Root
/// ├── root-entry
/// ├── Work
/// │   ├── work-entry
/// │   └── Email
/// │       └── email-entry
/// ├── Recycle Bin
/// │   ├── trashed-entry
/// │   └── Old
/// │       └── nested-trash
/// └── Templates
///     └── template-entry
fn sample_db() -> Database {
    let root = Group::new("root", "Root")
        .with_entry(entry("r1", "root-entry"))
        .with_group(
            Group::new("work", "Work")
                .with_group(
                    Group::new("email", "Email").with_entry(entry("e1", "email-entry")),
                )
                .with_entry(entry("w1", "work-entry")),
        )
        .with_group(
            Group::new("bin", "Recycle Bin")
                .with_entry(entry("t1", "trashed-entry"))
                .with_group(Group::new("old", "Old").with_entry(entry("t2", "nested-trash"))),
        )
        .with_group(Group::new("tpl", "Templates").with_entry(entry("p1", "template-entry")));

    let mut db = Database::new(root);
    db.recycle_bin = Some("bin".into());
    db.entry_templates = Some("tpl".into());
    db
}

fn render(db: &Database) -> String {
    exporter(true)
        .render_database(
            db,
            &ExportOptions {
                name: "Sample".into(),
            },
        )
        .unwrap()
}

#[test]
fn excluded_groups_and_descendants_are_skipped() {
    let html = render(&sample_db());

    assert!(html.contains("root-entry"));
    assert!(html.contains("work-entry"));
    assert!(html.contains("email-entry"));
    assert!(!html.contains("trashed-entry"));
    assert!(!html.contains("nested-trash"));
    assert!(!html.contains("template-entry"));
}

#[test]
fn exclusion_matches_uuid_not_name() {
    let mut db = sample_db();
    db.root.groups.push(
        Group::new("other-bin", "Recycle Bin").with_entry(entry("k1", "kept-entry")),
    );

    assert!(render(&db).contains("kept-entry"));
}

#[test]
fn entries_precede_child_groups_in_pre_order() {
    let html = render(&sample_db());

    let root = html.find("root-entry").unwrap();
    let work = html.find("work-entry").unwrap();
    let email = html.find("email-entry").unwrap();
    assert!(root < work);
    assert!(work < email);
}

#[test]
fn breadcrumb_includes_root_group_name() {
    let html = render(&sample_db());

    assert!(html.contains("<div class=\"path\">Root / Work / Email</div>"));
    assert!(html.contains("<div class=\"path\">Root</div>"));
}

#[test]
fn document_carries_title_and_app_identity() {
    let html = render(&sample_db());

    assert!(html.contains("<title>Sample</title>"));
    assert!(html.contains("<footer>Exported on "));
    assert!(html.contains("<a href=\"https://example.com/keexport\">keexport</a> v9.9.9"));
}

#[test]
fn single_entry_export_has_no_path() {
    let db = sample_db();
    let item = db.find_entry("e1").unwrap();
    let html = exporter(false).render_entry(&db, item).unwrap();

    assert!(html.contains("<h2>email-entry</h2>"));
    assert!(!html.contains("class=\"path\""));
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[test]
fn protected_fields_are_revealed_or_dropped() {
    let db = Database::new(Group::new("root", "Root"));
    let item = entry("x", "Secrets")
        .with_protected("Password", "hunter2")
        .with_protected("Backup code", "");

    let html = exporter(false).render_entry(&db, &item).unwrap();
    assert!(html.contains("<span class=\"protected\">hunter2</span>"));
    assert!(!html.contains("Backup code"));
}

#[test]
fn markdown_notes_follow_the_setting() {
    let db = Database::new(Group::new("root", "Root"));
    let item = entry("x", "Notes").with_field("Notes", "a *b*");

    let on = exporter(true).render_entry(&db, &item).unwrap();
    assert!(on.contains("<td class=\"markdown\">a <em>b</em></td>"));

    let off = exporter(false).render_entry(&db, &item).unwrap();
    assert!(off.contains("<td class=\"plain\">a *b*</td>"));
}

#[test]
fn expiry_is_shown_only_when_enabled() {
    let db = Database::new(Group::new("root", "Root"));
    let expiry = Utc.with_ymd_and_hms(2030, 1, 15, 8, 30, 0).unwrap();

    let mut item = entry("x", "Expiring");
    item.times.expiry = Some(expiry);
    let html = exporter(false).render_entry(&db, &item).unwrap();
    assert!(!html.contains("Expires"));

    item.times.expires = true;
    let html = exporter(false).render_entry(&db, &item).unwrap();
    assert!(html.contains("<th>Expires</th><td class=\"plain\">15 Jan 2030 08:30:00</td>"));
}

#[test]
fn created_modified_and_tags_are_rendered() {
    let db = Database::new(Group::new("root", "Root"));
    let item = entry("x", "Tagged").with_tag("work").with_tag("mail");

    let html = exporter(false).render_entry(&db, &item).unwrap();
    assert!(html.contains("<th>Tags</th><td class=\"plain\">work, mail</td>"));
    assert!(html.contains("<th>Created</th><td class=\"plain\">1 May 2024 12:00:00</td>"));
    assert!(html.contains("<th>Modified</th><td class=\"plain\">1 May 2024 12:00:00</td>"));
}

#[test]
fn referenced_attachments_become_data_uris() {
    let mut db = Database::new(Group::new("root", "Root"));
    db.binaries.push(Vec::new());
    db.binaries.push(b"hello".to_vec());

    let item = entry("x", "Files")
        .with_attachment("empty.bin", Binary::Ref(0))
        .with_attachment("hello.txt", Binary::Ref(1));

    let html = exporter(false).render_entry(&db, &item).unwrap();
    assert!(!html.contains("empty.bin"));
    assert!(html.contains("href=\"data:application/octet-stream;base64,aGVsbG8=\""));
}

#[test]
fn localized_labels_are_capitalized() {
    let db = Database::new(Group::new("root", "Root"));
    let item = entry("x", "Login")
        .with_field("UserName", "alice")
        .with_field("URL", "https://example.com");
    let dates = DateFormatter::new(Locale::fr_FR, FixedOffset::east_opt(0).unwrap());

    let html = HtmlExporter::new(Labels::for_language("fr"), dates, false)
        .render_entry(&db, &item)
        .unwrap();
    assert!(html.contains("<th>Utilisateur</th>"));
    assert!(html.contains("<th>Site web</th>"));
}

#[test]
fn row_titles_and_footer_follow_the_language() {
    let item = entry("x", "Login").with_tag("work");
    let mut expiring = entry("y", "Expiring");
    expiring.times.expires = true;
    expiring.times.expiry = Some(Utc.with_ymd_and_hms(2030, 1, 15, 8, 30, 0).unwrap());
    let db = Database::new(
        Group::new("root", "Tresor")
            .with_entry(item)
            .with_entry(expiring),
    );
    let dates = DateFormatter::new(Locale::de_DE, FixedOffset::east_opt(0).unwrap());

    let html = HtmlExporter::new(Labels::for_language("de"), dates, false)
        .render_database(&db, &ExportOptions { name: "Tresor".into() })
        .unwrap();
    assert!(html.contains("<th>Tags</th><td class=\"plain\">work</td>"));
    assert!(html.contains("<th>Erstellt</th><td class=\"plain\">1 Mai 2024 12:00:00</td>"));
    assert!(html.contains("<th>Geändert</th>"));
    assert!(html.contains("<th>Läuft ab</th><td class=\"plain\">15 Jan 2030 08:30:00</td>"));
    assert!(html.contains("<footer>Exportiert am "));
    assert!(html.contains(" von <a href=\""));
    assert!(!html.contains("Created"));
    assert!(!html.contains("Exported on"));
}

struct FailingTemplates;

impl Templates for FailingTemplates {
    fn render_document(&self, _view: &DocumentView) -> Result<String, ExportError> {
        Err(ExportError::Template("document".into()))
    }

    fn render_entry(&self, _view: &EntryView) -> Result<String, ExportError> {
        Err(ExportError::Template("entry".into()))
    }
}

#[test]
fn template_failures_abort_the_export() {
    let result = exporter(false)
        .with_templates(FailingTemplates)
        .render_database(&sample_db(), &ExportOptions::default());

    assert!(matches!(result, Err(ExportError::Template(msg)) if msg == "entry"));
}
