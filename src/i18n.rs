use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Translator capability
// ---------------------------------------------------------------------------

/// Resolves display strings by key.
///
/// Total: a key with no entry comes back unchanged, so callers never have
/// to handle a missing translation.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Returns every key as-is. Handy for checking which keys a builder asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEcho;

impl Translator for KeyEcho {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
    Pt,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Es, Language::En, Language::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    fn bundled_source(self) -> &'static str {
        match self {
            Language::Es => include_str!("../locales/es.json"),
            Language::En => include_str!("../locales/en.json"),
            Language::Pt => include_str!("../locales/pt.json"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language '{0}' (expected es, en or pt)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary is not a flat JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}

/// A flat key -> string table for one language.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    pub fn from_json(raw: &str) -> Result<Self, DictionaryError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dictionary = Self::from_json(&raw)?;
        debug!(
            "Loaded {} dictionary entries from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// The story and character strings shipped with the binary.
    pub fn bundled(language: Language) -> Result<Self, DictionaryError> {
        let dictionary = Self::from_json(language.bundled_source())?;
        debug!(
            "Loaded {} bundled entries for language {language}",
            dictionary.len()
        );
        Ok(dictionary)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Dictionary {
    fn translate(&self, key: &str) -> String {
        // Empty strings fall back to the key too.
        match self.get(key) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => key.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Replace `{name}` placeholders with values from `params`.
/// Placeholders without a value are left in place.
pub fn interpolate(template: &str, params: &[(&str, &dyn fmt::Display)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a ratio in `[0, 1]` as a percentage, e.g. `0.5` -> `"50%"`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}
