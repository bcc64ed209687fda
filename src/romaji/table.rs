/// Romaji → hiragana mappings, Hepburn with the common wāpuro variants.
/// Longest-match resolution happens in the trie, so overlapping keys
/// ("n" / "na" / "nya") are fine here.
pub(super) static MAPPINGS: &[(&str, &str)] = &[
    // Vowels
    ("a", "あ"),
    ("i", "い"),
    ("u", "う"),
    ("e", "え"),
    ("o", "お"),
    // K / G
    ("ka", "か"),
    ("ki", "き"),
    ("ku", "く"),
    ("ke", "け"),
    ("ko", "こ"),
    ("ga", "が"),
    ("gi", "ぎ"),
    ("gu", "ぐ"),
    ("ge", "げ"),
    ("go", "ご"),
    ("kya", "きゃ"),
    ("kyu", "きゅ"),
    ("kyo", "きょ"),
    ("gya", "ぎゃ"),
    ("gyu", "ぎゅ"),
    ("gyo", "ぎょ"),
    // S / Z
    ("sa", "さ"),
    ("si", "し"),
    ("shi", "し"),
    ("su", "す"),
    ("se", "せ"),
    ("so", "そ"),
    ("za", "ざ"),
    ("zi", "じ"),
    ("ji", "じ"),
    ("zu", "ず"),
    ("ze", "ぜ"),
    ("zo", "ぞ"),
    ("sha", "しゃ"),
    ("sya", "しゃ"),
    ("shu", "しゅ"),
    ("syu", "しゅ"),
    ("she", "しぇ"),
    ("sho", "しょ"),
    ("syo", "しょ"),
    ("ja", "じゃ"),
    ("jya", "じゃ"),
    ("zya", "じゃ"),
    ("ju", "じゅ"),
    ("jyu", "じゅ"),
    ("zyu", "じゅ"),
    ("je", "じぇ"),
    ("jo", "じょ"),
    ("jyo", "じょ"),
    ("zyo", "じょ"),
    // T / D
    ("ta", "た"),
    ("ti", "ち"),
    ("chi", "ち"),
    ("tsu", "つ"),
    ("tu", "つ"),
    ("te", "て"),
    ("to", "と"),
    ("da", "だ"),
    ("di", "ぢ"),
    ("du", "づ"),
    ("de", "で"),
    ("do", "ど"),
    ("cha", "ちゃ"),
    ("tya", "ちゃ"),
    ("chu", "ちゅ"),
    ("tyu", "ちゅ"),
    ("che", "ちぇ"),
    ("cho", "ちょ"),
    ("tyo", "ちょ"),
    // N row
    ("na", "な"),
    ("ni", "に"),
    ("nu", "ぬ"),
    ("ne", "ね"),
    ("no", "の"),
    ("nya", "にゃ"),
    ("nyu", "にゅ"),
    ("nyo", "にょ"),
    // H / B / P / F
    ("ha", "は"),
    ("hi", "ひ"),
    ("fu", "ふ"),
    ("hu", "ふ"),
    ("he", "へ"),
    ("ho", "ほ"),
    ("ba", "ば"),
    ("bi", "び"),
    ("bu", "ぶ"),
    ("be", "べ"),
    ("bo", "ぼ"),
    ("pa", "ぱ"),
    ("pi", "ぴ"),
    ("pu", "ぷ"),
    ("pe", "ぺ"),
    ("po", "ぽ"),
    ("hya", "ひゃ"),
    ("hyu", "ひゅ"),
    ("hyo", "ひょ"),
    ("bya", "びゃ"),
    ("byu", "びゅ"),
    ("byo", "びょ"),
    ("pya", "ぴゃ"),
    ("pyu", "ぴゅ"),
    ("pyo", "ぴょ"),
    ("fa", "ふぁ"),
    ("fi", "ふぃ"),
    ("fe", "ふぇ"),
    ("fo", "ふぉ"),
    // M
    ("ma", "ま"),
    ("mi", "み"),
    ("mu", "む"),
    ("me", "め"),
    ("mo", "も"),
    ("mya", "みゃ"),
    ("myu", "みゅ"),
    ("myo", "みょ"),
    // Y / R / W
    ("ya", "や"),
    ("yu", "ゆ"),
    ("yo", "よ"),
    ("ra", "ら"),
    ("ri", "り"),
    ("ru", "る"),
    ("re", "れ"),
    ("ro", "ろ"),
    ("rya", "りゃ"),
    ("ryu", "りゅ"),
    ("ryo", "りょ"),
    ("wa", "わ"),
    ("wo", "を"),
    // Moraic nasal: bare "n" resolves here only when no longer key
    // ("na", "nya", ...) matches. "nn" is disambiguated in the converter,
    // since "nn" before a vowel spells ん + な-row (konnichiwa).
    ("n", "ん"),
    ("n'", "ん"),
    // Small kana and marks
    ("xa", "ぁ"),
    ("xi", "ぃ"),
    ("xu", "ぅ"),
    ("xe", "ぇ"),
    ("xo", "ぉ"),
    ("xya", "ゃ"),
    ("xyu", "ゅ"),
    ("xyo", "ょ"),
    ("xtu", "っ"),
    ("xtsu", "っ"),
    ("ltu", "っ"),
    ("-", "ー"),
];
