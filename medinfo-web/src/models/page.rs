use crate::models::{DiseaseSummary, Language};
use crate::services::catalog::DiseaseCatalog;
use crate::services::translations::{Translations, Translator};

/// Entry of the language switcher.
#[derive(Debug, Clone)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Data every page layout needs: locale, strings and navigation.
pub struct PageContext<'a> {
    pub lang: &'static str,
    pub dir: &'static str,
    pub translations: Translator<'a>,
    pub languages: Vec<LanguageOption>,
    pub diseases: Vec<DiseaseSummary>,
    /// UI strings for the chat widget script, as a JSON object literal.
    pub widget_strings: String,
}

impl<'a> PageContext<'a> {
    pub fn new(language: Language, translations: &'a Translations, catalog: &DiseaseCatalog) -> Self {
        let translator = translations.for_language(language);

        let languages = Language::ALL
            .into_iter()
            .map(|option| LanguageOption {
                code: option.code(),
                label: option.native_name(),
                active: option == language,
            })
            .collect();

        let diseases = catalog
            .diseases()
            .iter()
            .map(|disease| DiseaseSummary {
                id: disease.id.clone(),
                name: translator.disease_name(&disease.id),
                description: translator.disease_description(&disease.id),
            })
            .collect();

        Self {
            lang: language.code(),
            dir: language.direction(),
            widget_strings: translator.widget_json(),
            translations: translator,
            languages,
            diseases,
        }
    }
}
