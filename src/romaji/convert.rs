use serde::Serialize;

use super::trie::RomajiTrie;

/// Result of converting player keyboard input to hiragana.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiraganaConversion {
    /// Full conversion; unconvertible latin is passed through as-is.
    pub hiragana: String,
    /// Variant used for incremental lookup while the player is still
    /// typing: a trailing ん reverts to "n" unless it was spelled
    /// explicitly ("nn" or "n'"), because a lone final n may yet become
    /// な/に/ぬ/ね/の.
    pub partial: String,
    /// True when the conversion consumed everything, i.e. no latin letters
    /// or apostrophes remain.
    pub valid: bool,
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'i' | b'u' | b'e' | b'o')
}

fn is_consonant(b: u8) -> bool {
    b.is_ascii_lowercase() && !is_vowel(b) && b != b'n'
}

/// Convert a romaji string to hiragana, longest-match over the mapping
/// table with the standard wāpuro rules for ん and っ.
fn convert(input: &str) -> String {
    let trie = RomajiTrie::global();
    let bytes = input.as_bytes();
    let mut out = String::new();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &input[i..];

        // "nn" spells a single ん, except before a vowel or y where the
        // second n starts its own syllable (kon-nichiwa, shin-nen).
        if rest.as_bytes().starts_with(b"nn") {
            out.push('ん');
            match rest.as_bytes().get(2) {
                Some(&b) if is_vowel(b) || b == b'y' => i += 1,
                _ => i += 2,
            }
            continue;
        }

        if let Some((consumed, kana)) = trie.longest_match(rest) {
            out.push_str(kana);
            i += consumed;
            continue;
        }

        let b = bytes[i];
        // Hepburn spells the nasal as m before b/p: "shimbun" → しんぶん.
        if b == b'm' && matches!(rest.as_bytes().get(1), Some(&b'b') | Some(&b'p')) {
            out.push('ん');
            i += 1;
            continue;
        }
        // Doubled consonant → sokuon: "kitte" → きって. "tch" doubles the
        // following ち ("matcha" → まっちゃ).
        if is_consonant(b) && rest.as_bytes().get(1) == Some(&b) {
            out.push('っ');
            i += 1;
            continue;
        }
        if b == b't' && rest.as_bytes().starts_with(b"tch") {
            out.push('っ');
            i += 1;
            continue;
        }

        // Unconvertible byte: pass the whole char through.
        let c = rest.chars().next().unwrap_or('\u{FFFD}');
        out.push(c);
        i += c.len_utf8();
    }

    out
}

/// Convert player input to hiragana with the game's partial/valid shape.
/// Input is lowercased first; the game treats romaji case-insensitively.
pub fn to_hiragana(word: &str) -> HiraganaConversion {
    let lower = word.to_lowercase();
    let hiragana = convert(&lower);
    let valid = !hiragana
        .chars()
        .any(|c| c.is_ascii_lowercase() || c == '\'');

    let partial = if hiragana.ends_with('ん') && !(lower.ends_with("nn") || lower.ends_with('\'')) {
        let mut p: String = hiragana.chars().take(hiragana.chars().count() - 1).collect();
        p.push('n');
        p
    } else {
        hiragana.clone()
    };

    HiraganaConversion {
        hiragana,
        partial,
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_words() {
        assert_eq!(to_hiragana("ongaku").hiragana, "おんがく");
        assert_eq!(to_hiragana("sakana").hiragana, "さかな");
        assert_eq!(to_hiragana("gakki").hiragana, "がっき");
        assert_eq!(to_hiragana("kyou").hiragana, "きょう");
        assert_eq!(to_hiragana("ramen").hiragana, "らめん");
        assert_eq!(to_hiragana("ra-men").hiragana, "らーめん");
    }

    #[test]
    fn test_double_n_disambiguation() {
        assert_eq!(to_hiragana("konnichiwa").hiragana, "こんにちわ");
        assert_eq!(to_hiragana("shinnen").hiragana, "しんねん");
        assert_eq!(to_hiragana("shiken").hiragana, "しけん");
        assert_eq!(to_hiragana("kann").hiragana, "かん");
        assert_eq!(to_hiragana("kan'i").hiragana, "かんい");
    }

    #[test]
    fn test_sokuon_and_nasal_m() {
        assert_eq!(to_hiragana("kitte").hiragana, "きって");
        assert_eq!(to_hiragana("matcha").hiragana, "まっちゃ");
        assert_eq!(to_hiragana("shimbun").hiragana, "しんぶん");
    }

    #[test]
    fn test_validity_flag() {
        assert!(to_hiragana("ongaku").valid);
        assert!(to_hiragana("ONGAKU").valid);
        assert!(!to_hiragana("ongakuq").valid);
        assert!(!to_hiragana("xyzzy").valid);
    }

    #[test]
    fn test_partial_trailing_n() {
        // Lone trailing n may still become な/に/..., so partial keeps "n".
        let conv = to_hiragana("shin");
        assert_eq!(conv.hiragana, "しん");
        assert_eq!(conv.partial, "しn");

        // Explicit spellings commit to ん.
        assert_eq!(to_hiragana("shinn").partial, "しん");
        assert_eq!(to_hiragana("shin'").partial, "しん");

        // No trailing ん: partial equals the full conversion.
        assert_eq!(to_hiragana("kyou").partial, "きょう");
    }
}
