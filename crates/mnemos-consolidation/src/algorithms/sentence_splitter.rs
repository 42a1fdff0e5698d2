//! Sentence boundaries for TextRank and keyword extraction.

/// Lowercased tokens that end with a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "mr", "mrs", "ms", "dr", "st", "approx",
];

/// Split on `.`, `!`, `?` followed by whitespace or end of text.
/// Fragments of two characters or fewer are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if !at_boundary {
            continue;
        }
        if c == '.' && ends_with_abbreviation(&text[start..i]) {
            continue;
        }
        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let last = fragment
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str())
}

fn push_trimmed(out: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if trimmed.chars().count() > 2 {
        out.push(trimmed.to_string());
    }
}
