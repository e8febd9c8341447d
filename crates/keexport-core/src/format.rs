//! String and date formatting helpers.

use chrono::{DateTime, FixedOffset, Local, Locale, Utc};

/// Date layout used for every timestamp in an export.
const DATE_TIME_FORMAT: &str = "%-d %b %Y %H:%M:%S";

/// Uppercase the first character, leaving the rest untouched.
pub fn cap_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Language code from `LC_TIME` or `LANG` (e.g. "it_IT.UTF-8" -> "it_IT").
pub fn system_language() -> String {
    let lang = std::env::var("LC_TIME")
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| "en_US".to_string());

    lang.split('.').next().unwrap_or("en_US").to_string()
}

/// Map a language code to a chrono locale, falling back to en_US.
pub fn locale_for(lang_code: &str) -> Locale {
    match lang_code {
        s if s.starts_with("it") => Locale::it_IT,
        s if s.starts_with("de") => Locale::de_DE,
        s if s.starts_with("fr") => Locale::fr_FR,
        s if s.starts_with("es") => Locale::es_ES,
        s if s.starts_with("pt") => Locale::pt_PT,
        s if s.starts_with("nl") => Locale::nl_NL,
        s if s.starts_with("pl") => Locale::pl_PL,
        s if s.starts_with("ru") => Locale::ru_RU,
        s if s.starts_with("ja") => Locale::ja_JP,
        s if s.starts_with("zh") => Locale::zh_CN,
        s if s.starts_with("ko") => Locale::ko_KR,
        s if s.starts_with("en_GB") => Locale::en_GB,
        _ => Locale::en_US,
    }
}

/// Where timestamps are shown.
#[derive(Debug, Clone, Copy)]
enum Zone {
    /// The system time zone, with the offset in effect at each date.
    Local,
    Fixed(FixedOffset),
}

/// Renders timestamps with localized month names.
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    locale: Locale,
    zone: Zone,
}

impl DateFormatter {
    /// Formatter pinned to one UTC offset.
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        Self {
            locale,
            zone: Zone::Fixed(offset),
        }
    }

    /// Formatter using the system time zone, so daylight saving time is
    /// applied per date.
    pub fn local(locale: Locale) -> Self {
        Self {
            locale,
            zone: Zone::Local,
        }
    }

    pub fn format(&self, time: &DateTime<Utc>) -> String {
        match self.zone {
            Zone::Local => time
                .with_timezone(&Local)
                .format_localized(DATE_TIME_FORMAT, self.locale)
                .to_string(),
            Zone::Fixed(offset) => time
                .with_timezone(&offset)
                .format_localized(DATE_TIME_FORMAT, self.locale)
                .to_string(),
        }
    }

    pub fn now(&self) -> String {
        self.format(&Utc::now())
    }
}
