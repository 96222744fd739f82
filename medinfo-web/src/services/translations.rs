//! Translation tables, one JSON file per language under `data/translations`.
//!
//! Lookups fall back to English, then to the key itself, so a missing string
//! shows up on the page instead of failing the render.

use crate::models::Language;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

type Table = HashMap<String, String>;

/// Strings the chat widget script reads from `window.translations`.
const WIDGET_KEYS: [&str; 3] = ["chatbot_welcome", "file_selected", "error_occurred"];

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Failed to parse {language} translations: {source}")]
    Parse {
        language: Language,
        source: serde_json::Error,
    },

    #[error("Translation table for {0} is empty")]
    Empty(Language),
}

fn embedded_source(language: Language) -> &'static str {
    match language {
        Language::En => include_str!("../../data/translations/en.json"),
        Language::Fr => include_str!("../../data/translations/fr.json"),
        Language::Ar => include_str!("../../data/translations/ar.json"),
    }
}

#[derive(Debug, Clone)]
pub struct Translations {
    tables: HashMap<Language, Table>,
}

impl Translations {
    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self, TranslationError> {
        let mut tables = HashMap::new();

        for language in Language::ALL {
            let table: Table = serde_json::from_str(embedded_source(language))
                .map_err(|source| TranslationError::Parse { language, source })?;
            if table.is_empty() {
                return Err(TranslationError::Empty(language));
            }
            tables.insert(language, table);
        }

        Ok(Self { tables })
    }

    pub fn for_language(&self, language: Language) -> Translator<'_> {
        Translator {
            language,
            table: self.tables.get(&language),
            fallback: self.tables.get(&Language::En),
        }
    }
}

/// Read-only view of one language's strings.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    language: Language,
    table: Option<&'a Table>,
    fallback: Option<&'a Table>,
}

impl<'a> Translator<'a> {
    pub fn language(&self) -> Language {
        self.language
    }

    /// Look up `key`, falling back to English and then to the key.
    pub fn t<'b>(&'b self, key: &'b str) -> &'b str {
        self.table
            .and_then(|table| table.get(key))
            .or_else(|| self.fallback.and_then(|table| table.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn disease_name(&self, id: &str) -> String {
        self.t(&format!("disease_{}", id)).to_string()
    }

    pub fn disease_description(&self, id: &str) -> String {
        self.t(&format!("disease_{}_description", id)).to_string()
    }

    /// JSON object with the chat widget strings, safe to embed in `<script>`.
    pub fn widget_json(&self) -> String {
        let strings: BTreeMap<&str, &str> =
            WIDGET_KEYS.iter().map(|key| (*key, self.t(key))).collect();

        serde_json::to_string(&strings)
            .unwrap_or_else(|_| "{}".to_string())
            .replace('<', "\\u003c")
    }
}
