//! keexport - export KeePass databases to HTML
//!
//! Reads the master password from `DB_PASSWORD` (environment or `.env`)
//! or from the first line of stdin.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use keexport_core::format::{locale_for, system_language};
use keexport_core::{select_entry, DateFormatter, ExportOptions, HtmlExporter, KeepassDatabase};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// keexport - export KeePass databases to HTML
#[derive(Parser, Debug)]
#[command(name = "keexport")]
#[command(version, about = "Export a KeePass database to a self-contained HTML file")]
struct Args {
    /// Path to the KeePass database file
    #[arg(short, long, value_name = "FILE")]
    database: PathBuf,

    /// Write the export here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Export a single entry, selected by UUID or exact title
    #[arg(short, long, value_name = "UUID|TITLE")]
    entry: Option<String>,

    /// Key file used together with the password
    #[arg(short, long, value_name = "FILE")]
    keyfile: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Document title (defaults to the database name)
    #[arg(short, long)]
    name: Option<String>,

    /// Render notes as markdown
    #[arg(long, overrides_with = "no_markdown")]
    markdown: bool,

    /// Keep notes as plain text
    #[arg(long, overrides_with = "markdown")]
    no_markdown: bool,

    /// Language for labels and dates, e.g. "de" or "fr_FR"
    #[arg(short, long)]
    language: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("keexport=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!("Exporting database: {}", args.database.display());

    let config = config::Config::load(args.config.clone())?;

    let use_markdown = if args.no_markdown {
        false
    } else {
        args.markdown || config.use_markdown
    };
    let language = args
        .language
        .clone()
        .or_else(|| config.language.clone())
        .unwrap_or_else(system_language);

    let password = read_password()?;
    let keepass = KeepassDatabase::unlock(&args.database, &password, args.keyfile.as_deref())?;
    let db = keepass.to_model();

    let exporter = HtmlExporter::new(
        config.labels(&language),
        DateFormatter::local(locale_for(&language)),
        use_markdown,
    );

    let html = match &args.entry {
        Some(query) => {
            let entry = select_entry(&db, query)?;
            exporter.render_entry(&db, entry)?
        }
        None => {
            let name = args
                .name
                .clone()
                .or_else(|| db.name.clone())
                .unwrap_or_else(|| file_stem(&args.database));
            exporter.render_database(&db, &ExportOptions { name })?
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", html.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Password from `DB_PASSWORD`, falling back to one line of stdin.
fn read_password() -> Result<String> {
    let _ = dotenvy::dotenv();

    if let Ok(password) = std::env::var("DB_PASSWORD") {
        tracing::info!("Found DB_PASSWORD in env");
        return Ok(password);
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("KeePass")
        .to_string()
}
