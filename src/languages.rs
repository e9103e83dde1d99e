//! Languages offered by the tutor UI

use serde::Serialize;

/// A supported response language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// ISO 639-1 code
    pub code: &'static str,
    /// English name
    pub name: &'static str,
    /// Name in the language itself
    pub native_name: &'static str,
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", native_name: "English" },
    Language { code: "ta", name: "Tamil", native_name: "தமிழ்" },
    Language { code: "hi", name: "Hindi", native_name: "हिन्दी" },
    Language { code: "te", name: "Telugu", native_name: "తెలుగు" },
    Language { code: "ml", name: "Malayalam", native_name: "മലയാളം" },
    Language { code: "es", name: "Spanish", native_name: "Español" },
    Language { code: "fr", name: "French", native_name: "Français" },
    Language { code: "de", name: "German", native_name: "Deutsch" },
    Language { code: "ja", name: "Japanese", native_name: "日本語" },
    Language { code: "zh", name: "Chinese", native_name: "中文" },
    Language { code: "ar", name: "Arabic", native_name: "العربية" },
    Language { code: "pt", name: "Portuguese", native_name: "Português" },
    Language { code: "ko", name: "Korean", native_name: "한국어" },
    Language { code: "ru", name: "Russian", native_name: "Русский" },
];

/// Looks up a language by its code, ignoring case.
pub fn find_language(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
}

/// English name for a code, or the input itself when unknown.
///
/// The backend accepts free-form language names, so unknown values pass
/// through untouched.
pub fn language_name(code: &str) -> &str {
    find_language(code).map(|lang| lang.name).unwrap_or(code)
}
