//! Line classification and tokenization.

/// Characters that open a comment line when they are the first non-whitespace character.
pub const DEFAULT_COMMENT_MARKERS: &[char] = &['#', '$', 'C', 'c'];

/// Character that opens a section marker line.
pub const SECTION_MARKER: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment(&'a str),
    Marker(&'a str),
    Data(&'a str),
}

pub fn classify_line<'a>(line: &'a str, comment_markers: &[char]) -> LineKind<'a> {
    let trimmed = line.trim();
    match trimmed.chars().next() {
        None => LineKind::Blank,
        Some(SECTION_MARKER) => LineKind::Marker(trimmed),
        Some(c) if comment_markers.contains(&c) => LineKind::Comment(trimmed),
        Some(_) => LineKind::Data(trimmed),
    }
}

/// Splits a data line on whitespace and commas, dropping empty fields.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_comments_markers_and_data() {
        let markers = DEFAULT_COMMENT_MARKERS;
        assert_eq!(classify_line("   ", markers), LineKind::Blank);
        assert_eq!(
            classify_line("# note", markers),
            LineKind::Comment("# note")
        );
        assert!(matches!(classify_line("$ note", markers), LineKind::Comment(_)));
        assert!(matches!(classify_line("c lower", markers), LineKind::Comment(_)));
        assert!(matches!(classify_line("CAPS", markers), LineKind::Comment(_)));
        assert_eq!(classify_line("  /NODE  ", markers), LineKind::Marker("/NODE"));
        assert_eq!(classify_line(" 1 0 0 0", markers), LineKind::Data("1 0 0 0"));
    }

    #[test]
    fn tokenizes_whitespace_and_commas() {
        assert_eq!(tokenize("1  2.0\t3.0"), vec!["1", "2.0", "3.0"]);
        assert_eq!(tokenize("1,2.0, 3.0,,4"), vec!["1", "2.0", "3.0", "4"]);
        assert!(tokenize("").is_empty());
    }
}
