//! Normalizes partitions to the app's language configuration.

use std::sync::Arc;

use crate::config::LanguagesConfig;
use crate::content::{ContentFieldData, INVARIANT};
use crate::converter::{ContentFieldConverter, Converter, FieldAction};
use crate::error::ConvertError;
use crate::schema::Field;
use crate::value::JsonValue;

/// Resolves the partitions of every root field against the configured
/// languages.
///
/// - Invariant fields keep only `iv`. If `iv` is missing, the master
///   language value takes its place (the field was localized before).
/// - Localized fields lose partitions of unknown languages. Missing or null
///   languages are filled from their fallback chain, ending at the master
///   language. With [`only`](Self::only), the output is restricted to the
///   requested languages.
#[derive(Debug, Clone)]
pub struct ResolveLanguages {
    languages: LanguagesConfig,
    fallback: bool,
    requested: Vec<String>,
}

impl ResolveLanguages {
    pub fn new(languages: LanguagesConfig) -> Self {
        Self {
            languages,
            fallback: true,
            requested: Vec::new(),
        }
    }

    /// Enable or disable filling missing languages from fallbacks.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Only return the given languages. Unknown codes are ignored.
    pub fn only<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested = languages.into_iter().map(Into::into).collect();
        self
    }

    fn resolve_invariant(&self, data: Arc<ContentFieldData>) -> Arc<ContentFieldData> {
        if data.len() == 1 && data.contains_key(INVARIANT) {
            return data;
        }

        let value = data
            .get(INVARIANT)
            .or_else(|| data.get(&self.languages.master))
            .cloned();

        let mut result = ContentFieldData::with_capacity(1);
        if let Some(value) = value {
            result.insert(INVARIANT, value);
        }
        Arc::new(result)
    }

    fn resolve_localized(&self, data: Arc<ContentFieldData>) -> Arc<ContentFieldData> {
        let mut result: Option<ContentFieldData> = None;

        for key in data.keys() {
            if !self.languages.contains(key) {
                result
                    .get_or_insert_with(|| (*data).clone())
                    .remove(key);
            }
        }

        if self.fallback {
            for code in self.languages.codes() {
                let current = result.as_ref().unwrap_or(&*data);
                if has_value(current, code) {
                    continue;
                }

                let Some(value) = self
                    .languages
                    .fallback_chain(code)
                    .find_map(|fallback| current.get(fallback).filter(|v| !v.is_null()))
                    .cloned()
                else {
                    continue;
                };

                result
                    .get_or_insert_with(|| (*data).clone())
                    .insert(code, value);
            }
        }

        if !self.requested.is_empty() {
            let current = result.as_ref().unwrap_or(&*data);
            if current.keys().any(|key| !self.requested.contains(key)) {
                result
                    .get_or_insert_with(|| (*data).clone())
                    .retain(|key, _| self.requested.contains(key));
            }
        }

        result.map(Arc::new).unwrap_or(data)
    }
}

fn has_value(data: &ContentFieldData, key: &str) -> bool {
    data.get(key).is_some_and(|v| !JsonValue::is_null(v))
}

impl Converter for ResolveLanguages {
    fn as_field_converter(self: Arc<Self>) -> Option<Arc<dyn ContentFieldConverter>> {
        Some(self)
    }
}

impl ContentFieldConverter for ResolveLanguages {
    fn convert_field_before(
        &self,
        field: &Field,
        data: Arc<ContentFieldData>,
    ) -> Result<FieldAction, ConvertError> {
        if field.is_localized() {
            return Ok(FieldAction::Keep(data));
        }
        Ok(FieldAction::Keep(self.resolve_invariant(data)))
    }

    fn convert_field_after(
        &self,
        field: &Field,
        data: Arc<ContentFieldData>,
    ) -> Result<FieldAction, ConvertError> {
        if !field.is_localized() {
            return Ok(FieldAction::Keep(data));
        }
        Ok(FieldAction::Keep(self.resolve_localized(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageConfig;
    use crate::schema::ScalarKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn languages() -> LanguagesConfig {
        LanguagesConfig::new(
            "en",
            vec![
                LanguageConfig::new("en"),
                LanguageConfig::new("de"),
                LanguageConfig::new("de-CH").with_fallbacks(["de"]),
            ],
        )
        .unwrap()
    }

    fn field_data(value: serde_json::Value) -> Arc<ContentFieldData> {
        Arc::new(serde_json::from_value(value).unwrap())
    }

    fn kept(action: FieldAction) -> serde_json::Value {
        match action {
            FieldAction::Keep(data) => serde_json::to_value(&*data).unwrap(),
            FieldAction::Remove => panic!("field should be kept"),
        }
    }

    #[test]
    fn test_invariant_field_takes_master_value() {
        let field = Field::scalar(1, "slug", ScalarKind::String);
        let data = field_data(json!({ "de": "hallo", "en": "hello" }));

        let action = ResolveLanguages::new(languages())
            .convert_field_before(&field, data)
            .unwrap();
        assert_eq!(kept(action), json!({ "iv": "hello" }));
    }

    #[test]
    fn test_invariant_field_without_value_becomes_empty() {
        let field = Field::scalar(1, "slug", ScalarKind::String);
        let data = field_data(json!({ "fr": "bonjour" }));

        let action = ResolveLanguages::new(languages())
            .convert_field_before(&field, data)
            .unwrap();
        assert_eq!(kept(action), json!({}));
    }

    #[test]
    fn test_localized_field_resolves_fallback_chain() {
        let field = Field::scalar(1, "title", ScalarKind::String).localized();
        let data = field_data(json!({ "en": "hello", "de": "hallo", "xx": "?" }));

        let action = ResolveLanguages::new(languages())
            .convert_field_after(&field, data)
            .unwrap();
        assert_eq!(
            kept(action),
            json!({ "en": "hello", "de": "hallo", "de-CH": "hallo" })
        );
    }

    #[test]
    fn test_fallback_reaches_master_language() {
        let field = Field::scalar(1, "title", ScalarKind::String).localized();
        let data = field_data(json!({ "en": "hello", "de": null }));

        let action = ResolveLanguages::new(languages())
            .convert_field_after(&field, data)
            .unwrap();
        assert_eq!(
            kept(action),
            json!({ "en": "hello", "de": "hello", "de-CH": "hello" })
        );
    }

    #[test]
    fn test_requested_languages_restrict_output() {
        let field = Field::scalar(1, "title", ScalarKind::String).localized();
        let data = field_data(json!({ "en": "hello", "de": "hallo" }));

        let action = ResolveLanguages::new(languages())
            .with_fallback(false)
            .only(["de"])
            .convert_field_after(&field, data)
            .unwrap();
        assert_eq!(kept(action), json!({ "de": "hallo" }));
    }

    #[test]
    fn test_resolved_field_is_not_copied() {
        let field = Field::scalar(1, "title", ScalarKind::String).localized();
        let data = field_data(json!({ "en": "a", "de": "b", "de-CH": "c" }));

        let FieldAction::Keep(result) = ResolveLanguages::new(languages())
            .convert_field_after(&field, data.clone())
            .unwrap()
        else {
            panic!("field should be kept");
        };
        assert!(Arc::ptr_eq(&data, &result));
    }
}
