//! Configuration for content conversion.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Options for the rewrite engine.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConvertOptions {
    /// Maximum nesting of items and components before a nested record is
    /// dropped. Guards against components that reference themselves.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

/// One configured content language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageConfig {
    /// ISO code used as partition key, e.g. `en` or `de`.
    pub iso2: String,
    /// Languages tried, in order, when a value for this language is missing.
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl LanguageConfig {
    pub fn new(iso2: impl Into<String>) -> Self {
        Self {
            iso2: iso2.into(),
            fallbacks: Vec::new(),
        }
    }

    pub fn with_fallbacks<I, S>(mut self, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallbacks = fallbacks.into_iter().map(Into::into).collect();
        self
    }
}

/// The set of languages an app stores content in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguagesConfig {
    /// The master language; final fallback for every other language.
    pub master: String,
    pub languages: Vec<LanguageConfig>,
}

impl LanguagesConfig {
    /// Build a config, checking that the master language is configured.
    pub fn new(master: impl Into<String>, languages: Vec<LanguageConfig>) -> Result<Self, ConvertError> {
        let config = Self {
            master: master.into(),
            languages,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !self.contains(&self.master) {
            return Err(ConvertError::schema(
                "languages",
                format!("master language '{}' is not configured", self.master),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, iso2: &str) -> bool {
        self.languages.iter().any(|l| l.iso2 == iso2)
    }

    pub fn get(&self, iso2: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|l| l.iso2 == iso2)
    }

    /// Iterate the configured language codes in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.iso2.as_str())
    }

    /// Fallback chain for `iso2`: its own fallbacks, then the master language.
    pub fn fallback_chain<'a>(&'a self, iso2: &'a str) -> impl Iterator<Item = &'a str> {
        let own = self
            .get(iso2)
            .map(|l| l.fallbacks.as_slice())
            .unwrap_or_default();

        own.iter()
            .map(String::as_str)
            .chain(std::iter::once(self.master.as_str()))
            .filter(move |code| *code != iso2)
    }
}
