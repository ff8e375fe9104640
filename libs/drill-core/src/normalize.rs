//! Script-aware text normalization.
//!
//! Every function here is pure and total. The composition order is fixed:
//! case fold, script passes, whitespace policy, then NFC. Each stage is
//! idempotent, so normalizing an already normalized string is a no-op.

use crate::script::Script;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// How aggressively to fold spelling variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// The first comparison for every script.
    Primary,
    /// Extra-lenient fallback for high-variance scripts. Also drops vowel
    /// signs and native digits, so it is never tried first.
    Special,
}

const NUKTAS: [char; 7] = [
    '\u{093C}', '\u{09BC}', '\u{0A3C}', '\u{0ABC}', '\u{0B3C}', '\u{0C3C}', '\u{0CBC}',
];

const DANDA: char = '\u{0964}';
const DOUBLE_DANDA: char = '\u{0965}';

/// Primary normalization of `text` under `script`.
pub fn normalize(text: &str, script: Script) -> String {
    normalize_with(text, script, Strictness::Primary)
}

/// The stricter fallback pass. Identical to [`normalize`] for scripts that
/// are not high-variance.
pub fn normalize_lenient(text: &str, script: Script) -> String {
    normalize_with(text, script, Strictness::Special)
}

pub fn normalize_with(text: &str, script: Script, strictness: Strictness) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let folded = if script.has_case() {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    };
    let visible: String = folded.chars().filter(|c| !is_invisible(*c)).collect();

    let passed = match script {
        Script::Latin | Script::Other => visible,
        Script::LatinAccented | Script::Greek => strip_accents(&visible),
        Script::Cyrillic => fold_cyrillic(&visible),
        Script::Arabic => fold_arabic(&visible),
        Script::Hebrew => strip_hebrew_points(&visible),
        Script::Cjk => fold_full_width(&visible),
        Script::Thai => visible,
        indic => {
            let primary = fold_indic(&visible);
            match strictness {
                Strictness::Primary => primary,
                Strictness::Special => fold_indic_special(&primary, indic),
            }
        }
    };

    let spaced: String = if script.is_unspaced() {
        passed.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        normalize_whitespace(&passed)
    };

    spaced.nfc().collect()
}

/// Trim and collapse whitespace runs to a single space.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Zero-width space, word joiner and byte order mark.
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{2060}' | '\u{FEFF}')
}

fn is_zero_width_joiner(c: char) -> bool {
    matches!(c, '\u{200C}' | '\u{200D}')
}

/// Decompose and drop combining diacritics, then fold the letters that
/// carry their mark in the base glyph.
fn strip_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            'ø' => out.push('o'),
            'ł' => out.push('l'),
            'đ' => out.push('d'),
            'ı' => out.push('i'),
            _ => out.push(c),
        }
    }
    out
}

fn fold_cyrillic(s: &str) -> String {
    s.nfc()
        .map(|c| match c {
            'ё' => 'е',
            'Ё' => 'Е',
            _ => c,
        })
        .collect()
}

fn is_arabic_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0640}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}'
    )
}

/// Strip harakat and tatweel, fold alif and yā’ letterforms.
fn fold_arabic(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_arabic_diacritic(*c))
        .map(|c| match c {
            // madda, hamza and wasla forms; the first three only survive
            // when the decomposition was not applied upstream
            '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' => '\u{0627}',
            '\u{0649}' | '\u{06CC}' | '\u{0626}' => '\u{064A}',
            _ => c,
        })
        .collect()
}

fn strip_hebrew_points(s: &str) -> String {
    s.nfd()
        .filter(|c| !(('\u{0591}'..='\u{05C7}').contains(c) && is_combining_mark(*c)))
        .collect()
}

/// Full-width ASCII forms to ASCII, lower-cased.
fn fold_full_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Primary Indic pass: nukta, joiners, danda and look-alike conjuncts.
fn fold_indic(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd() {
        if NUKTAS.contains(&c) || is_zero_width_joiner(c) {
            continue;
        }
        match c {
            DANDA | DOUBLE_DANDA => out.push('.'),
            // Bengali khanda ta is ta + hasanta
            '\u{09CE}' => out.push_str("\u{09A4}\u{09CD}"),
            // Tamil sha is written interchangeably with ssa in sri
            '\u{0BB6}' => out.push('\u{0BB8}'),
            _ => out.push(c),
        }
    }
    out
}

/// Special Indic pass over already primary-folded text.
fn fold_indic_special(s: &str, script: Script) -> String {
    let digits = script.native_digits();
    let base = script.brahmic_block_base();
    s.chars()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(digits, Some((lo, hi)) if (lo..=hi).contains(c)))
        .map(|c| base.map_or(c, |base| fold_brahmic_variant(c, base)))
        .collect()
}

/// Fold letters whose spellings are commonly swapped: long independent
/// vowels to short, retroflex na to dental na, sha and ssa to sa. The
/// offsets are shared by every block with the ISCII layout.
fn fold_brahmic_variant(c: char, base: u32) -> char {
    let code = c as u32;
    if !(base..base + 0x80).contains(&code) {
        return c;
    }
    let target = match code - base {
        0x08 => 0x07,
        0x0A => 0x09,
        0x23 => 0x28,
        0x36 | 0x37 => 0x38,
        _ => return c,
    };
    char::from_u32(base + target).unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize("", Script::Latin), "");
        assert_eq!(normalize("   \t\n", Script::Bengali), "");
        assert_eq!(normalize_lenient("", Script::Devanagari), "");
    }

    #[test]
    fn test_latin_case_fold_and_whitespace() {
        assert_eq!(normalize("  Hello   World  ", Script::Latin), "hello world");
        assert_eq!(normalize("Bird", Script::Latin), "bird");
    }

    #[test]
    fn test_latin_keeps_accents() {
        assert_eq!(normalize("Café", Script::Latin), "café");
    }

    #[test]
    fn test_latin_accented_strips_diacritics() {
        assert_eq!(normalize("Café", Script::LatinAccented), "cafe");
        assert_eq!(normalize("niño", Script::LatinAccented), "nino");
        assert_eq!(normalize("Straße", Script::LatinAccented), "strasse");
        assert_eq!(normalize("Łódź", Script::LatinAccented), "lodz");
        assert_eq!(normalize("smørrebrød", Script::LatinAccented), "smorrebrod");
    }

    #[test]
    fn test_decomposed_input_matches_composed() {
        assert_eq!(
            normalize("cafe\u{0301}", Script::Latin),
            normalize("café", Script::Latin)
        );
    }

    #[test]
    fn test_greek_tonos() {
        assert_eq!(normalize("Γάτα", Script::Greek), "γατα");
    }

    #[test]
    fn test_cyrillic_yo() {
        assert_eq!(normalize("Ёж", Script::Cyrillic), "еж");
        assert_eq!(normalize("е\u{0308}ж", Script::Cyrillic), "еж");
    }

    #[test]
    fn test_arabic_harakat_and_letterforms() {
        assert_eq!(normalize("قِطَّة", Script::Arabic), "قطة");
        assert_eq!(normalize("أسد", Script::Arabic), "اسد");
        assert_eq!(normalize("إبل", Script::Arabic), "ابل");
        assert_eq!(normalize("مستشفى", Script::Arabic), "مستشفي");
        assert_eq!(normalize("کتابـــ", Script::Arabic), "کتاب");
    }

    #[test]
    fn test_hebrew_niqqud() {
        assert_eq!(normalize("חָתוּל", Script::Hebrew), "חתול");
    }

    #[test]
    fn test_cjk_removes_whitespace_and_folds_width() {
        assert_eq!(normalize("猫 咪", Script::Cjk), "猫咪");
        assert_eq!(normalize("ＡＢＣ　ｄ", Script::Cjk), "abcd");
        assert_eq!(normalize("แมว ดำ", Script::Thai), "แมวดำ");
    }

    #[test]
    fn test_bengali_nukta_forms_agree() {
        // precomposed rra versus dda + nukta
        let precomposed = normalize("বি\u{09DC}াল", Script::Bengali);
        let decomposed = normalize("বি\u{09A1}\u{09BC}াল", Script::Bengali);
        assert_eq!(precomposed, decomposed);
        assert_eq!(precomposed, "বি\u{09A1}াল");
    }

    #[test]
    fn test_devanagari_nukta_stripped() {
        assert_eq!(normalize("क़लम", Script::Devanagari), "कलम");
    }

    #[test]
    fn test_indic_joiners_and_danda() {
        assert_eq!(normalize("র\u{200D}্য", Script::Bengali), "র্য");
        assert_eq!(normalize("नमस्ते।", Script::Devanagari), "नमस्ते.");
        assert_eq!(normalize("শেষ॥", Script::Bengali), "শেষ.");
    }

    #[test]
    fn test_bengali_khanda_ta() {
        assert_eq!(
            normalize("হঠা\u{09CE}", Script::Bengali),
            normalize("হঠা\u{09A4}\u{09CD}", Script::Bengali)
        );
    }

    #[test]
    fn test_primary_keeps_matras() {
        assert_ne!(normalize("বিড়াল", Script::Bengali), normalize("বড়াল", Script::Bengali));
    }

    #[test]
    fn test_special_drops_matras_and_digits() {
        assert_eq!(
            normalize_lenient("বিড়াল", Script::Bengali),
            normalize_lenient("বড়াল", Script::Bengali)
        );
        assert_eq!(normalize_lenient("ক১২খ", Script::Bengali), "কখ");
        assert_eq!(normalize_lenient("घर २", Script::Devanagari), "घर");
    }

    #[test]
    fn test_special_folds_spelling_variants() {
        // ii to i, sha to sa, nna to na
        assert_eq!(
            normalize_lenient("ঈশান", Script::Bengali),
            normalize_lenient("ইসান", Script::Bengali)
        );
        assert_eq!(
            normalize_lenient("कारण", Script::Devanagari),
            normalize_lenient("कारन", Script::Devanagari)
        );
    }

    #[test]
    fn test_special_is_primary_for_low_variance_scripts() {
        for text in ["Café", "قِطَّة", "Γάτα", "猫 咪"] {
            for script in [Script::LatinAccented, Script::Arabic, Script::Greek, Script::Cjk] {
                assert_eq!(normalize_lenient(text, script), normalize(text, script));
            }
        }
    }

    #[test]
    fn test_unknown_script_only_case_folds() {
        assert_eq!(normalize("  ÉCOLE  ", Script::Other), "école");
    }

    #[test]
    fn test_invisible_characters_removed() {
        assert_eq!(normalize("c\u{200B}at\u{FEFF}", Script::Latin), "cat");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "  Hello   World ",
            "Straße Café",
            "İstanbul",
            "ΟΔΟΣ",
            "Ёлка",
            "أَسَد إبل",
            "חָתוּל",
            "ＡＢＣ 猫",
            "বি\u{09DC}াল ১২ \u{200D}",
            "हठा\u{09CE} क़लम। ",
            "ஶ்ரீ",
            "ಕನ್ನಡ ೧",
            "\u{200D} trailing",
        ];
        for script in Script::ALL {
            for strictness in [Strictness::Primary, Strictness::Special] {
                for text in samples {
                    let once = normalize_with(text, script, strictness);
                    let twice = normalize_with(&once, script, strictness);
                    assert_eq!(once, twice, "{text:?} under {script} / {strictness:?}");
                }
            }
        }
    }
}
