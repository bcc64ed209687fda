//! Character-level Unicode classification for Japanese text.
//!
//! Only ideographic characters participate in grade/level filtering; kana
//! never do. The prolonged sound mark ー (U+30FC) is treated as katakana so
//! readings like "らーめん" classify cleanly.

/// Class of a single character as seen by the candidate pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Hiragana,
    Katakana,
    Ideographic,
    Other,
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_ideographic(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

pub fn classify_char(c: char) -> CharClass {
    if is_hiragana(c) {
        CharClass::Hiragana
    } else if is_katakana(c) {
        CharClass::Katakana
    } else if is_ideographic(c) {
        CharClass::Ideographic
    } else {
        CharClass::Other
    }
}

/// Check if a string is a valid hiragana reading.
///
/// Accepts hiragana characters (U+3040..U+309F) and the prolonged sound mark
/// ー which commonly appears in readings like "らーめん".
pub fn is_hiragana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_hiragana(c) || c == 'ー')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hiragana_reading() {
        assert!(is_hiragana_reading("おんがく"));
        assert!(is_hiragana_reading("あ"));
        assert!(is_hiragana_reading("らーめん"));
        assert!(!is_hiragana_reading("カタカナ"));
        assert!(!is_hiragana_reading("abc"));
        assert!(!is_hiragana_reading(""));
    }

    #[test]
    fn test_char_classification() {
        assert_eq!(classify_char('あ'), CharClass::Hiragana);
        assert_eq!(classify_char('ア'), CharClass::Katakana);
        assert_eq!(classify_char('ー'), CharClass::Katakana);
        assert_eq!(classify_char('漢'), CharClass::Ideographic);
        assert_eq!(classify_char('音'), CharClass::Ideographic);
        // Real JMdict data contains forms like ３密 for 三密; fullwidth
        // digits are neither kana nor ideographic.
        assert_eq!(classify_char('３'), CharClass::Other);
        assert_eq!(classify_char('a'), CharClass::Other);
    }
}
