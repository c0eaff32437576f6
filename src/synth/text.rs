//! Text cleanup applied before synthesis.

/// Rewrite typographic punctuation and symbols into plain ASCII the
/// synthesizer pronounces, then collapse whitespace runs and trim.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '`' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '&' => out.push_str(" and "),
            '\u{2022}' | '\u{00B7}' => out.push('-'),
            '\u{00A9}' | '\u{00AE}' | '\u{2122}' => {}
            '\u{00B0}' => out.push_str(" degrees "),
            '\u{20AC}' | '\u{00A3}' | '\u{00A5}' | '\u{20B9}' => out.push('$'),
            '\u{00D7}' => out.push('x'),
            '\u{00F7}' => out.push('/'),
            other => out.push(other),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
