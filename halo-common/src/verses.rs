//! Verse boundary parser
//!
//! Derives `(verse number, text)` pairs from a raw passage blob that carries
//! no structural verse markup. A boundary marker is an integer token at the
//! start of the text or immediately after a newline, followed by whitespace.
//!
//! The heuristic cannot distinguish a literal number that happens to start a
//! line in prose from a real verse marker. That limitation is inherent to the
//! input format and deliberately left as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One verse of a passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Verse number (positive; need not be contiguous across a passage)
    pub verse: u32,
    /// Verse text (non-empty, whitespace-collapsed)
    pub text: String,
}

/// Verse boundary: a number token at start-of-text or after a newline,
/// followed by whitespace.
static VERSE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)\s*(\d+)\s+").expect("verse marker regex"));

/// Collapse all internal whitespace (including newlines) to single spaces
/// and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse verse boundaries out of a raw text blob.
///
/// Returns an empty vec when no boundary markers are found; the caller must
/// then treat the whole blob as unstructured text rather than verses.
/// Verses whose text is empty after trimming are dropped (the matched number
/// was likely not a real marker).
pub fn parse_verses(raw: &str) -> Vec<Verse> {
    let cleaned = raw.replace('\r', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }

    struct Marker {
        number: u32,
        text_start: usize,
        match_start: usize,
    }

    let markers: Vec<Marker> = VERSE_MARKER
        .captures_iter(cleaned)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let number = cap.get(1)?.as_str().parse::<u32>().ok()?;
            Some(Marker {
                number,
                text_start: whole.end(),
                match_start: whole.start(),
            })
        })
        .collect();

    if markers.is_empty() {
        return Vec::new();
    }

    let mut verses = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map(|next| next.match_start)
            .unwrap_or(cleaned.len());
        let text = collapse_whitespace(&cleaned[marker.text_start..end]);
        if !text.is_empty() {
            verses.push(Verse {
                verse: marker.number,
                text,
            });
        }
    }

    verses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(verse: u32, text: &str) -> Verse {
        Verse {
            verse,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_no_markers_yields_empty() {
        assert!(parse_verses("").is_empty());
        assert!(parse_verses("   \n  ").is_empty());
        assert!(parse_verses("For God so loved the world.").is_empty());
        // Number mid-line is not a boundary
        assert!(parse_verses("There were 12 tribes gathered there.").is_empty());
    }

    #[test]
    fn test_two_verses() {
        let parsed = parse_verses("1 In the beginning.\n2 God created.");
        assert_eq!(
            parsed,
            vec![v(1, "In the beginning."), v(2, "God created.")]
        );
    }

    #[test]
    fn test_leading_whitespace_and_cr() {
        let parsed = parse_verses("  1 In the beginning.\r\n  2 God created.\r\n");
        assert_eq!(
            parsed,
            vec![v(1, "In the beginning."), v(2, "God created.")]
        );
    }

    #[test]
    fn test_internal_whitespace_collapsed() {
        let parsed = parse_verses("1 In the\n   beginning\tGod created\n2 the heavens.");
        assert_eq!(
            parsed,
            vec![v(1, "In the beginning God created"), v(2, "the heavens.")]
        );
    }

    #[test]
    fn test_empty_verse_dropped() {
        // "3" is followed only by whitespace before the next marker
        let parsed = parse_verses("1 First words.\n3   \n4 Later words.");
        assert_eq!(parsed, vec![v(1, "First words."), v(4, "Later words.")]);
    }

    #[test]
    fn test_noncontiguous_numbers_preserved() {
        let parsed = parse_verses("1 Alpha.\n5 Omega.");
        assert_eq!(parsed, vec![v(1, "Alpha."), v(5, "Omega.")]);
    }

    #[test]
    fn test_number_after_newline_in_prose_is_a_marker() {
        // Known heuristic limitation: a bare number starting a line is
        // always treated as a verse marker.
        let parsed = parse_verses("1 He counted them:\n12 were chosen.");
        assert_eq!(
            parsed,
            vec![v(1, "He counted them:"), v(12, "were chosen.")]
        );
    }

    #[test]
    fn test_rejoin_roundtrip() {
        let input = "1 In the beginning God created the heavens.\n2 And the earth was without form.\n3 And God said, Let there be light.";
        let parsed = parse_verses(input);
        let rejoined = parsed
            .iter()
            .map(|v| format!("{} {}", v.verse, v.text))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_verses(&rejoined), parsed);
    }
}
