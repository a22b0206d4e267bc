//! Supported wiki languages.

/// A language truepedia can search and read in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Wiki subdomain / ISO code
    pub code: &'static str,
    /// English name
    pub name: &'static str,
    /// Name in the language itself
    pub native: &'static str,
}

/// All supported languages, in display order
pub const LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        name: "English",
        native: "English",
    },
    Language {
        code: "es",
        name: "Spanish",
        native: "Español",
    },
    Language {
        code: "fr",
        name: "French",
        native: "Français",
    },
    Language {
        code: "de",
        name: "German",
        native: "Deutsch",
    },
    Language {
        code: "it",
        name: "Italian",
        native: "Italiano",
    },
    Language {
        code: "pt",
        name: "Portuguese",
        native: "Português",
    },
    Language {
        code: "ru",
        name: "Russian",
        native: "Русский",
    },
    Language {
        code: "ja",
        name: "Japanese",
        native: "日本語",
    },
    Language {
        code: "zh",
        name: "Chinese",
        native: "中文",
    },
    Language {
        code: "ar",
        name: "Arabic",
        native: "العربية",
    },
    Language {
        code: "hi",
        name: "Hindi",
        native: "हिन्दी",
    },
    Language {
        code: "ko",
        name: "Korean",
        native: "한국어",
    },
    Language {
        code: "nl",
        name: "Dutch",
        native: "Nederlands",
    },
    Language {
        code: "sv",
        name: "Swedish",
        native: "Svenska",
    },
    Language {
        code: "fi",
        name: "Finnish",
        native: "Suomi",
    },
    Language {
        code: "no",
        name: "Norwegian",
        native: "Norsk",
    },
    Language {
        code: "da",
        name: "Danish",
        native: "Dansk",
    },
    Language {
        code: "pl",
        name: "Polish",
        native: "Polski",
    },
    Language {
        code: "uk",
        name: "Ukrainian",
        native: "Українська",
    },
    Language {
        code: "el",
        name: "Greek",
        native: "Ελληνικά",
    },
    Language {
        code: "he",
        name: "Hebrew",
        native: "עברית",
    },
    Language {
        code: "id",
        name: "Indonesian",
        native: "Bahasa Indonesia",
    },
    Language {
        code: "vi",
        name: "Vietnamese",
        native: "Tiếng Việt",
    },
    Language {
        code: "fa",
        name: "Persian",
        native: "فارسی",
    },
    Language {
        code: "tr",
        name: "Turkish",
        native: "Türkçe",
    },
    Language {
        code: "cs",
        name: "Czech",
        native: "Čeština",
    },
    Language {
        code: "hu",
        name: "Hungarian",
        native: "Magyar",
    },
    Language {
        code: "ro",
        name: "Romanian",
        native: "Română",
    },
    Language {
        code: "th",
        name: "Thai",
        native: "ไทย",
    },
];

/// Look up a language by code
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Whether the code is one of the supported languages
pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

/// English name for a code, or the code itself if unknown
pub fn language_name(code: &str) -> &str {
    find(code).map(|l| l.name).unwrap_or(code)
}

/// Native name for a code, or the code itself if unknown
pub fn native_name(code: &str) -> &str {
    find(code).map(|l| l.native).unwrap_or(code)
}

/// Label shown when choosing between language versions of an article
pub fn display_label(code: &str) -> String {
    format!("{} - {} ({})", native_name(code), language_name(code), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("de"), "German");
        assert_eq!(native_name("de"), "Deutsch");
        assert_eq!(native_name("ja"), "日本語");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(language_name("xx"), "xx");
        assert_eq!(native_name("xx"), "xx");
        assert!(!is_supported("xx"));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), LANGUAGES.len());
        assert_eq!(LANGUAGES.len(), 29);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("fr"), "Français - French (fr)");
        assert_eq!(display_label("la"), "la - la (la)");
    }
}
