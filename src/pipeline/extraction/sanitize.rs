/// UTF-8 degree sign read back as Latin-1.
const DEGREE_MOJIBAKE: &str = "\u{00C2}\u{00B0}";

/// Clean recognized report text before vitals extraction.
///
/// Repairs a mis-decoded degree sign, turns non-breaking spaces into plain
/// spaces, replaces control characters with spaces, trims each line and drops
/// blank lines. A control character never joins the text on either side of it,
/// so cleaning cannot turn `6\0 8` into a readable `68`. Clinical punctuation such as `:` `/` `%` `°` and parentheses is untouched.
pub fn sanitize_report_text(raw: &str) -> String {
    raw.replace(DEGREE_MOJIBAKE, "°")
        .chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(c),
            '\u{00A0}' | '\u{202F}' => Some(' '),
            c if c.is_control() => Some(' '),
            c => Some(c),
        })
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
