//! Language switching behind an injected translator.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
#[error("unsupported language '{0}'")]
pub struct UnsupportedLanguage(String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "espanol" | "español" | "spanish" => Ok(Language::Es),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Whatever renders the kiosk in another language.
pub trait Translator: Send {
    fn is_ready(&self) -> bool;
    fn set_language(&mut self, language: Language);
}

/// Translator for headless use: always ready, does nothing.
#[derive(Debug, Default)]
pub struct NoopTranslator;

impl Translator for NoopTranslator {
    fn is_ready(&self) -> bool {
        true
    }

    fn set_language(&mut self, _language: Language) {}
}
