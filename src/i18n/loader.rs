//! Translation loader and i18n management
//!
//! Translations are JSON files named `<lang>.json` in the configured
//! directory. Keys are nested objects addressed with dots, e.g.
//! `wizard.saved`. Placeholders look like `{name}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde_json::{Value, Map};
use tokio::fs;
use tracing::{info, warn, error, debug};
use crate::utils::errors::{AdRelayError, Result};
use crate::config::I18nConfig;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
    translations_dir: PathBuf,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            translations_dir: PathBuf::from(&config.translations_dir),
        }
    }

    /// Load all translation files from the translations directory.
    /// Only a missing or broken default language is fatal.
    pub async fn load_translations(&mut self) -> Result<()> {
        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = self.translations_dir.join(format!("{}.json", lang_code));

            match self.load_language_file(&file_path, lang_code).await {
                Ok(key_count) => info!(language = %lang_code, keys = key_count, "Loaded translations"),
                Err(e) if lang_code == &self.default_language => {
                    error!(language = %lang_code, error = %e, "Failed to load default language");
                    return Err(AdRelayError::Config(format!(
                        "Failed to load default language translations from {}: {}",
                        file_path.display(),
                        e
                    )));
                }
                Err(e) => warn!(language = %lang_code, error = %e, "Skipping translations"),
            }
        }

        Ok(())
    }

    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<usize> {
        let content = fs::read_to_string(file_path).await?;
        let translations: Value = serde_json::from_str(&content)?;
        self.insert_translations(lang_code, translations)
    }

    /// Register translations for a language from a JSON object
    pub fn insert_translations(&mut self, lang_code: &str, translations: Value) -> Result<usize> {
        let Value::Object(map) = translations else {
            return Err(AdRelayError::Config(format!(
                "Invalid translation file format for {}",
                lang_code
            )));
        };

        let key_count = count_keys(&map);
        debug!("Loaded {} translation keys for {}", key_count, lang_code);
        self.translations.insert(lang_code.to_string(), map);
        Ok(key_count)
    }

    /// Get a translated message, falling back to the default language and
    /// then to the key itself
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        let text = self
            .get_translation_text(key, effective_lang)
            .or_else(|| self.get_translation_text(key, &self.default_language));

        match text {
            Some(text) => format_message(text, params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Shorthand for a single `{name}` parameter
    pub fn t_with(&self, key: &str, lang: &str, name: &str, value: impl ToString) -> String {
        let mut params = TranslationParams::new();
        params.insert(name.to_string(), value.to_string());
        self.t(key, lang, Some(&params))
    }

    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    fn get_effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    fn get_translation_text(&self, key: &str, lang: &str) -> Option<&str> {
        let mut current = self.translations.get(lang)?;
        let mut parts = key.split('.').peekable();

        while let Some(part) = parts.next() {
            let value = current.get(part)?;
            if parts.peek().is_none() {
                return value.as_str();
            }
            current = value.as_object()?;
        }

        None
    }

    /// Find which button a reply-keyboard label belongs to, in any loaded
    /// language. Returns the key under `buttons`.
    pub fn match_button(&self, text: &str) -> Option<String> {
        let text = text.trim();
        self.translations.values().find_map(|translations| {
            translations
                .get("buttons")?
                .as_object()?
                .iter()
                .find(|(_, label)| label.as_str() == Some(text))
                .map(|(key, _)| key.clone())
        })
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Detect user language from Telegram language code
    pub fn detect_user_language(&self, telegram_lang: Option<&str>) -> String {
        if let Some(lang) = telegram_lang {
            // "en-US" -> "en"
            let lang_code = lang.split('-').next().unwrap_or(lang);

            if self.is_language_supported(lang_code) {
                return lang_code.to_string();
            }
        }

        self.default_language.clone()
    }
}

fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    let mut result = template.to_string();
    if let Some(params) = params {
        for (key, value) in params {
            result = result.replace(&format!("{{{}}}", key), value);
        }
    }
    result
}

fn count_keys(obj: &Map<String, Value>) -> usize {
    obj.values()
        .map(|value| match value {
            Value::Object(nested) => count_keys(nested),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_i18n() -> I18n {
        let config = I18nConfig {
            default_language: "uz".to_string(),
            supported_languages: vec!["uz".to_string(), "en".to_string()],
            translations_dir: "translations".to_string(),
        };
        let mut i18n = I18n::new(&config);
        i18n.insert_translations("uz", json!({
            "buttons": { "ads": "Reklamalar", "save": "Saqlash" },
            "wizard": { "saved": "Saqlandi: {id}" },
            "only_uz": "faqat"
        })).unwrap();
        i18n.insert_translations("en", json!({
            "buttons": { "ads": "Advertisements", "save": "Save" },
            "wizard": { "saved": "Saved: {id}" }
        })).unwrap();
        i18n
    }

    #[test]
    fn test_nested_lookup_and_formatting() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.t_with("wizard.saved", "en", "id", 7), "Saved: 7");
        assert_eq!(i18n.t_with("wizard.saved", "uz", "id", 7), "Saqlandi: 7");
    }

    #[test]
    fn test_fallbacks() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.t("only_uz", "en", None), "faqat");
        assert_eq!(i18n.t("buttons.ads", "fr", None), "Reklamalar");
        assert_eq!(i18n.t("missing.key", "en", None), "missing.key");
        assert_eq!(i18n.t("wizard", "en", None), "wizard");
    }

    #[test]
    fn test_match_button_in_any_language() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.match_button("Save").as_deref(), Some("save"));
        assert_eq!(i18n.match_button(" Saqlash ").as_deref(), Some("save"));
        assert_eq!(i18n.match_button("Reklamalar").as_deref(), Some("ads"));
        assert_eq!(i18n.match_button("hello"), None);
    }

    #[test]
    fn test_language_detection() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.detect_user_language(Some("en-US")), "en");
        assert_eq!(i18n.detect_user_language(Some("uz")), "uz");
        assert_eq!(i18n.detect_user_language(Some("fr")), "uz");
        assert_eq!(i18n.detect_user_language(None), "uz");
    }

    #[test]
    fn test_rejects_non_object_translations() {
        let mut i18n = create_test_i18n();
        assert!(i18n.insert_translations("en", json!(["not", "an", "object"])).is_err());
    }

    #[tokio::test]
    async fn test_bundled_translations_cover_the_same_keys() {
        let config = I18nConfig {
            default_language: "uz".to_string(),
            supported_languages: vec!["uz".to_string(), "en".to_string()],
            translations_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/translations").to_string(),
        };
        let mut i18n = I18n::new(&config);
        i18n.load_translations().await.unwrap();

        let uz = count_keys(&i18n.translations["uz"]);
        let en = count_keys(&i18n.translations["en"]);
        assert!(uz > 0);
        assert_eq!(uz, en);
    }
}
