//! Writing systems and the normalization ruleset each one selects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalization ruleset, keyed by writing system.
///
/// The set is closed. Anything the resolver cannot place lands on
/// [`Script::Other`], which only gets the universal case-fold and NFC steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    /// English and other Latin-script languages compared with accents intact.
    Latin,
    /// Latin-script languages compared accent-insensitively.
    LatinAccented,
    Greek,
    Cyrillic,
    /// Arabic, Urdu, Persian, Pashto, Sindhi.
    Arabic,
    Hebrew,
    Devanagari,
    /// Bengali and Assamese.
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Sinhala,
    /// Han, Kana and Hangul.
    Cjk,
    /// Thai, Lao, Khmer and Myanmar. No spacing between words.
    Thai,
    Other,
}

impl Default for Script {
    fn default() -> Self {
        Self::Latin
    }
}

/// Tags that name no particular language.
const NON_CONCRETE_TAGS: &[&str] = &["", "auto", "any", "mixed", "none", "und", "zxx"];

const LANGUAGE_TAGS: &[(&[&str], Script)] = &[
    (&["en", "sw", "id", "ms", "tl", "fil", "la", "english"], Script::Latin),
    (
        &[
            "es", "fr", "pt", "de", "it", "pl", "ro", "ca", "nl", "sv", "da", "no", "nb", "nn",
            "fi", "is", "tr", "cs", "sk", "hu", "hr", "sl", "vi", "et", "lv", "lt", "ga", "cy",
            "eu", "gl", "az", "spanish", "french", "portuguese", "german", "italian", "polish",
            "romanian", "vietnamese", "turkish",
        ],
        Script::LatinAccented,
    ),
    (&["el", "greek"], Script::Greek),
    (
        &["ru", "uk", "bg", "sr", "mk", "be", "kk", "ky", "mn", "russian", "ukrainian"],
        Script::Cyrillic,
    ),
    (
        &["ar", "ur", "fa", "ps", "sd", "ks", "ug", "arabic", "urdu", "persian", "pashto"],
        Script::Arabic,
    ),
    (&["he", "iw", "yi", "hebrew"], Script::Hebrew),
    (
        &[
            "hi", "mr", "ne", "sa", "kok", "mai", "doi", "brx", "bho", "hindi", "marathi",
            "nepali", "sanskrit", "devanagari",
        ],
        Script::Devanagari,
    ),
    (&["bn", "as", "bengali", "bangla", "assamese"], Script::Bengali),
    (&["pa", "punjabi", "gurmukhi"], Script::Gurmukhi),
    (&["gu", "gujarati"], Script::Gujarati),
    (&["or", "od", "oriya", "odia"], Script::Oriya),
    (&["ta", "tamil"], Script::Tamil),
    (&["te", "telugu"], Script::Telugu),
    (&["kn", "kannada"], Script::Kannada),
    (&["ml", "malayalam"], Script::Malayalam),
    (&["si", "sinhala", "sinhalese"], Script::Sinhala),
    (
        &["zh", "ja", "ko", "yue", "cmn", "chinese", "japanese", "korean", "cjk"],
        Script::Cjk,
    ),
    (&["th", "lo", "km", "my", "thai", "lao", "khmer", "burmese"], Script::Thai),
];

/// ISO 15924 codes, as they appear in script subtags (`sr-Latn`, `zh-Hant`).
const SCRIPT_CODES: &[(&str, Script)] = &[
    ("latn", Script::Latin),
    ("grek", Script::Greek),
    ("cyrl", Script::Cyrillic),
    ("arab", Script::Arabic),
    ("hebr", Script::Hebrew),
    ("deva", Script::Devanagari),
    ("beng", Script::Bengali),
    ("guru", Script::Gurmukhi),
    ("gujr", Script::Gujarati),
    ("orya", Script::Oriya),
    ("taml", Script::Tamil),
    ("telu", Script::Telugu),
    ("knda", Script::Kannada),
    ("mlym", Script::Malayalam),
    ("sinh", Script::Sinhala),
    ("hans", Script::Cjk),
    ("hant", Script::Cjk),
    ("hani", Script::Cjk),
    ("jpan", Script::Cjk),
    ("kore", Script::Cjk),
    ("hira", Script::Cjk),
    ("kana", Script::Cjk),
    ("hang", Script::Cjk),
    ("thai", Script::Thai),
    ("laoo", Script::Thai),
    ("khmr", Script::Thai),
    ("mymr", Script::Thai),
];

impl Script {
    /// All rulesets, in declaration order.
    pub const ALL: [Script; 19] = [
        Self::Latin,
        Self::LatinAccented,
        Self::Greek,
        Self::Cyrillic,
        Self::Arabic,
        Self::Hebrew,
        Self::Devanagari,
        Self::Bengali,
        Self::Gurmukhi,
        Self::Gujarati,
        Self::Oriya,
        Self::Tamil,
        Self::Telugu,
        Self::Kannada,
        Self::Malayalam,
        Self::Sinhala,
        Self::Cjk,
        Self::Thai,
        Self::Other,
    ];

    /// Stable identifier, identical to the serialized form.
    pub fn id(self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::LatinAccented => "latin_accented",
            Self::Greek => "greek",
            Self::Cyrillic => "cyrillic",
            Self::Arabic => "arabic",
            Self::Hebrew => "hebrew",
            Self::Devanagari => "devanagari",
            Self::Bengali => "bengali",
            Self::Gurmukhi => "gurmukhi",
            Self::Gujarati => "gujarati",
            Self::Oriya => "oriya",
            Self::Tamil => "tamil",
            Self::Telugu => "telugu",
            Self::Kannada => "kannada",
            Self::Malayalam => "malayalam",
            Self::Sinhala => "sinhala",
            Self::Cjk => "cjk",
            Self::Thai => "thai",
            Self::Other => "other",
        }
    }

    /// Parse a language or script tag.
    ///
    /// Returns `None` for tags that do not name a concrete language (blank,
    /// `auto`, `mixed`, ...). Unrecognized but concrete tags map to
    /// [`Script::Other`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        if NON_CONCRETE_TAGS.contains(&tag.as_str()) {
            return None;
        }

        let mut subtags = tag.split(|c: char| c == '-' || c == '_');
        let primary = subtags.next().unwrap_or_default();
        let by_primary = Self::lookup_language(primary)
            .or_else(|| Self::lookup_script_code(primary))
            .or_else(|| Self::lookup_id(primary));
        let by_subtag = subtags
            .filter(|s| s.len() == 4)
            .find_map(Self::lookup_script_code);

        let script = match (by_primary, by_subtag) {
            // Romanized forms of non-English languages keep their diacritics
            (Some(Self::Latin), Some(Self::Latin)) => Self::Latin,
            (Some(_), Some(Self::Latin)) => Self::LatinAccented,
            (_, Some(subtag)) => subtag,
            (Some(primary), None) => primary,
            (None, None) => Self::Other,
        };
        Some(script)
    }

    fn lookup_language(code: &str) -> Option<Self> {
        LANGUAGE_TAGS
            .iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, script)| *script)
    }

    fn lookup_script_code(code: &str) -> Option<Self> {
        SCRIPT_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, script)| *script)
    }

    fn lookup_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Whether the script distinguishes upper and lower case.
    pub fn has_case(self) -> bool {
        matches!(
            self,
            Self::Latin | Self::LatinAccented | Self::Greek | Self::Cyrillic | Self::Other
        )
    }

    /// Brahmic scripts of South Asia.
    pub fn is_indic(self) -> bool {
        matches!(
            self,
            Self::Devanagari
                | Self::Bengali
                | Self::Gurmukhi
                | Self::Gujarati
                | Self::Oriya
                | Self::Tamil
                | Self::Telugu
                | Self::Kannada
                | Self::Malayalam
                | Self::Sinhala
        )
    }

    pub fn is_arabic_family(self) -> bool {
        matches!(self, Self::Arabic)
    }

    /// Scripts with enough everyday spelling variation to earn the
    /// lenient fallback pass.
    pub fn is_high_variance(self) -> bool {
        self.is_indic()
    }

    /// Scripts written without spaces between words.
    pub fn is_unspaced(self) -> bool {
        matches!(self, Self::Cjk | Self::Thai)
    }

    /// First code point of the script's 128-character block, for the nine
    /// scripts that share the ISCII-derived layout.
    pub(crate) fn brahmic_block_base(self) -> Option<u32> {
        match self {
            Self::Devanagari => Some(0x0900),
            Self::Bengali => Some(0x0980),
            Self::Gurmukhi => Some(0x0A00),
            Self::Gujarati => Some(0x0A80),
            Self::Oriya => Some(0x0B00),
            Self::Tamil => Some(0x0B80),
            Self::Telugu => Some(0x0C00),
            Self::Kannada => Some(0x0C80),
            Self::Malayalam => Some(0x0D00),
            _ => None,
        }
    }

    /// Native decimal digits, if the script has its own.
    pub(crate) fn native_digits(self) -> Option<(char, char)> {
        match self {
            Self::Sinhala => Some(('\u{0DE6}', '\u{0DEF}')),
            _ => self.brahmic_block_base().and_then(|base| {
                Some((char::from_u32(base + 0x66)?, char::from_u32(base + 0x6F)?))
            }),
        }
    }

    /// Script of a single character, if it falls in a known non-ASCII block.
    pub fn of_char(c: char) -> Option<Self> {
        let script = match c as u32 {
            0x00C0..=0x00D6 | 0x00D8..=0x00F6 | 0x00F8..=0x024F | 0x1E00..=0x1EFF => {
                Self::LatinAccented
            }
            0x0370..=0x03FF | 0x1F00..=0x1FFF => Self::Greek,
            0x0400..=0x052F => Self::Cyrillic,
            0x0590..=0x05FF | 0xFB1D..=0xFB4F => Self::Hebrew,
            0x0600..=0x06FF
            | 0x0750..=0x077F
            | 0x08A0..=0x08FF
            | 0xFB50..=0xFDFF
            | 0xFE70..=0xFEFF => Self::Arabic,
            0x0900..=0x097F | 0xA8E0..=0xA8FF => Self::Devanagari,
            0x0980..=0x09FF => Self::Bengali,
            0x0A00..=0x0A7F => Self::Gurmukhi,
            0x0A80..=0x0AFF => Self::Gujarati,
            0x0B00..=0x0B7F => Self::Oriya,
            0x0B80..=0x0BFF => Self::Tamil,
            0x0C00..=0x0C7F => Self::Telugu,
            0x0C80..=0x0CFF => Self::Kannada,
            0x0D00..=0x0D7F => Self::Malayalam,
            0x0D80..=0x0DFF => Self::Sinhala,
            0x0E00..=0x0EFF | 0x1000..=0x109F | 0x1780..=0x17FF => Self::Thai,
            0x1100..=0x11FF
            | 0x3040..=0x30FF
            | 0x3100..=0x318F
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xAC00..=0xD7AF
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFFEF
            | 0x20000..=0x2FA1F => Self::Cjk,
            _ => return None,
        };
        Some(script)
    }

    /// Character-range heuristic: the first character in a known block
    /// decides. Plain ASCII text has no such character and stays Latin.
    pub fn detect(text: &str) -> Option<Self> {
        text.chars().find_map(Self::of_char)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
