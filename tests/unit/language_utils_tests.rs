/*!
 * Tests for language utility functions
 */

use cueplay::language_utils::{display_language, get_language_name, language_codes_match, normalize_to_part2t};

#[test]
fn test_normalize_withTwoLetterCode_shouldReturnPart2t() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t(" FR ").unwrap(), "fra");
}

#[test]
fn test_normalize_withBibliographicCode_shouldConvert() {
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
}

#[test]
fn test_normalize_withInvalidCodes_shouldFail() {
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("und").is_err());
    assert!(normalize_to_part2t("english").is_err());
}

#[test]
fn test_languageCodesMatch_acrossForms_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fre", "fr"));
    assert!(language_codes_match("deu", "ger"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("und", "und"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_displayLanguage_shouldFallBackGracefully() {
    assert_eq!(display_language("eng"), "English");
    assert_eq!(display_language("und"), "Unknown");
    assert_eq!(display_language(""), "Unknown");
    assert_eq!(display_language("q1x"), "Q1X");
}
