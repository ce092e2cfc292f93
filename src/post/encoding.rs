//! @acp:module "Encoding Repair"
//! @acp:summary "Fix UTF-8 text that was decoded as Windows-1252/Latin-1"
//! @acp:domain content
//! @acp:layer service

/// Mis-decoded sequence and its intended character. Patterns are disjoint,
/// so replacement order does not matter.
const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"), // â€™ -> ’
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),  // â€˜ -> ‘
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),  // â€œ -> “
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),   // â€<9D> -> ”
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"), // â€“ -> –
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"), // â€” -> —
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),   // â€¦ -> …
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),   // â€¢ -> •
    ("\u{e2}\u{2020}\u{2019}", "\u{2192}"), // â†’ -> →
    ("\u{c2}\u{b0}", "\u{b0}"),             // Â° -> °
    ("\u{c2}\u{b7}", "\u{b7}"),             // Â· -> ·
    ("\u{c2}\u{bd}", "\u{bd}"),             // Â½ -> ½
    ("\u{c2}\u{a0}", "\u{a0}"),             // Â<nbsp> -> nbsp
    ("\u{c3}\u{a9}", "\u{e9}"),             // Ã© -> é
    ("\u{c3}\u{a8}", "\u{e8}"),             // Ã¨ -> è
    ("\u{c3}\u{b1}", "\u{f1}"),             // Ã± -> ñ
    ("\u{c3}\u{2014}", "\u{d7}"),           // Ã— -> ×
];

/// Replace every known mojibake sequence in `text`
pub fn repair_encoding(text: &str) -> String {
    // Fast path: every pattern starts with â, Â or Ã
    if !text.contains(['\u{e2}', '\u{c2}', '\u{c3}']) {
        return text.to_string();
    }
    MOJIBAKE
        .iter()
        .fold(text.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}
