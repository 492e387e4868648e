//! Heuristic source-language detection.
//!
//! Looks at the dominant script of a short sample rather than doing any
//! statistical language modelling. Good enough to decide whether a
//! translation call would be a no-op.

use crate::config::Lang;

/// Characters inspected from the start of the text
const SAMPLE_CHARS: usize = 200;

/// A rule wins once its match count in the sample exceeds this
const MATCH_THRESHOLD: usize = 5;

/// Fallback when no script rule wins
const DEFAULT_LANG: &str = "en";

/// Script rules in priority order.
///
/// Kana and Hangul are checked before CJK ideographs: Japanese and Korean
/// text routinely contains Han characters, but the reverse never holds.
const RULES: &[(&str, fn(char) -> bool)] = &[
    ("ja", is_kana),
    ("ko", is_hangul),
    ("zh", is_cjk_ideograph),
    ("ru", is_cyrillic),
    ("ar", is_arabic),
];

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}')
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

fn is_arabic(c: char) -> bool {
    matches!(c, '\u{0600}'..='\u{06FF}')
}

/// Best-guess language of `text`, from the first 200 characters.
///
/// Total and deterministic: always returns a code, defaulting to English
/// when no script dominates the sample.
pub fn detect_language(text: &str) -> Lang {
    let sample: Vec<char> = text.chars().take(SAMPLE_CHARS).collect();

    for (code, matches) in RULES {
        let count = sample.iter().filter(|c| matches(**c)).count();
        if count > MATCH_THRESHOLD {
            return Lang::new(*code);
        }
    }

    Lang::new(DEFAULT_LANG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english_by_default() {
        assert_eq!(detect_language("Hello, this is a plain English email.").as_str(), "en");
        assert_eq!(detect_language("").as_str(), "en");
        assert_eq!(detect_language("1234 !!! ???").as_str(), "en");
    }

    #[test]
    fn test_detects_chinese() {
        assert_eq!(detect_language("这是一封来自系统的通知邮件，请查收。").as_str(), "zh");
    }

    #[test]
    fn test_detects_japanese_over_chinese() {
        // Mixed kanji and kana resolves as Japanese, not Chinese
        assert_eq!(detect_language("お世話になっております。添付の資料をご確認ください。").as_str(), "ja");
    }

    #[test]
    fn test_detects_korean() {
        assert_eq!(detect_language("안녕하세요. 새로운 메일이 도착했습니다.").as_str(), "ko");
    }

    #[test]
    fn test_detects_russian() {
        assert_eq!(detect_language("Здравствуйте, вам пришло новое письмо.").as_str(), "ru");
    }

    #[test]
    fn test_detects_arabic() {
        assert_eq!(detect_language("مرحبا، لقد وصلتك رسالة جديدة الآن").as_str(), "ar");
    }

    #[test]
    fn test_below_threshold_defaults_to_english() {
        // Five CJK characters do not exceed the threshold of five
        assert_eq!(detect_language("你好世界了 hello").as_str(), "en");
    }

    #[test]
    fn test_only_samples_leading_characters() {
        // Chinese text past the 200-char sample window is not seen
        let text = format!("{}{}", "a".repeat(200), "这是一封中文邮件需要翻译处理".repeat(5));
        assert_eq!(detect_language(&text).as_str(), "en");
    }
}
