//! Display labels for the standard entry fields and the document chrome.

/// A translatable piece of text in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    User,
    Password,
    Website,
    Notes,
    Tags,
    Created,
    Modified,
    Expires,
    /// Footer text before the export date.
    ExportedOn,
    /// Footer text before the application link.
    By,
}

impl Label {
    pub const ALL: [Label; 10] = [
        Label::User,
        Label::Password,
        Label::Website,
        Label::Notes,
        Label::Tags,
        Label::Created,
        Label::Modified,
        Label::Expires,
        Label::ExportedOn,
        Label::By,
    ];

    /// Name of the label in the config file's `[labels]` table.
    pub fn key(self) -> &'static str {
        match self {
            Label::User => "user",
            Label::Password => "password",
            Label::Website => "website",
            Label::Notes => "notes",
            Label::Tags => "tags",
            Label::Created => "created",
            Label::Modified => "modified",
            Label::Expires => "expires",
            Label::ExportedOn => "exported_on",
            Label::By => "by",
        }
    }

    pub fn from_key(key: &str) -> Option<Label> {
        Self::ALL.into_iter().find(|label| label.key() == key)
    }
}

/// Label table for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub user: String,
    pub password: String,
    pub website: String,
    pub notes: String,
    pub tags: String,
    pub created: String,
    pub modified: String,
    pub expires: String,
    pub exported_on: String,
    pub by: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self::from_table([
            "user",
            "password",
            "website",
            "notes",
            "tags",
            "created",
            "modified",
            "expires",
            "Exported on",
            "by",
        ])
    }
}

impl Labels {
    fn from_table(table: [&str; 10]) -> Self {
        let [user, password, website, notes, tags, created, modified, expires, exported_on, by] =
            table.map(str::to_string);
        Self {
            user,
            password,
            website,
            notes,
            tags,
            created,
            modified,
            expires,
            exported_on,
            by,
        }
    }

    /// Built-in labels for a language code such as "de" or "fr_FR.UTF-8".
    pub fn for_language(code: &str) -> Self {
        let lang = code.get(..2).unwrap_or_default().to_ascii_lowercase();
        match lang.as_str() {
            "de" => Self::from_table([
                "Benutzer",
                "Passwort",
                "Webseite",
                "Notizen",
                "Tags",
                "erstellt",
                "geändert",
                "läuft ab",
                "Exportiert am",
                "von",
            ]),
            "fr" => Self::from_table([
                "utilisateur",
                "mot de passe",
                "site web",
                "notes",
                "étiquettes",
                "créé",
                "modifié",
                "expire",
                "Exporté le",
                "par",
            ]),
            "es" => Self::from_table([
                "usuario",
                "contraseña",
                "sitio web",
                "notas",
                "etiquetas",
                "creado",
                "modificado",
                "caduca",
                "Exportado el",
                "por",
            ]),
            "it" => Self::from_table([
                "utente",
                "password",
                "sito web",
                "note",
                "etichette",
                "creato",
                "modificato",
                "scade",
                "Esportato il",
                "da",
            ]),
            "nl" => Self::from_table([
                "gebruiker",
                "wachtwoord",
                "website",
                "notities",
                "labels",
                "aangemaakt",
                "gewijzigd",
                "verloopt",
                "Geëxporteerd op",
                "door",
            ]),
            "pt" => Self::from_table([
                "usuário",
                "senha",
                "site",
                "notas",
                "etiquetas",
                "criado",
                "modificado",
                "expira",
                "Exportado em",
                "por",
            ]),
            "ru" => Self::from_table([
                "пользователь",
                "пароль",
                "сайт",
                "заметки",
                "метки",
                "создано",
                "изменено",
                "истекает",
                "Экспортировано",
                "программой",
            ]),
            _ => Self::default(),
        }
    }

    pub fn get(&self, label: Label) -> &str {
        match label {
            Label::User => &self.user,
            Label::Password => &self.password,
            Label::Website => &self.website,
            Label::Notes => &self.notes,
            Label::Tags => &self.tags,
            Label::Created => &self.created,
            Label::Modified => &self.modified,
            Label::Expires => &self.expires,
            Label::ExportedOn => &self.exported_on,
            Label::By => &self.by,
        }
    }

    pub fn set(&mut self, label: Label, text: impl Into<String>) {
        let slot = match label {
            Label::User => &mut self.user,
            Label::Password => &mut self.password,
            Label::Website => &mut self.website,
            Label::Notes => &mut self.notes,
            Label::Tags => &mut self.tags,
            Label::Created => &mut self.created,
            Label::Modified => &mut self.modified,
            Label::Expires => &mut self.expires,
            Label::ExportedOn => &mut self.exported_on,
            Label::By => &mut self.by,
        };
        *slot = text.into();
    }
}
