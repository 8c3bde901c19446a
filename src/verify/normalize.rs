//! Deterministic text normalization
//!
//! Two OCR reads of the same physical document must fingerprint
//! identically, so quote styles, dashes and whitespace noise are folded
//! away before hashing. The fingerprint normalization also drops blank
//! lines; the display variant keeps them and must never be fed to the hash.

/// Fold Unicode characters OCR commonly produces into their ASCII forms
fn substitute_unicode(text: &str) -> String {
    text.chars()
        .flat_map(|c| -> Box<dyn Iterator<Item = char>> {
            match c {
                '\u{201C}' | '\u{201D}' | '\u{201E}' => Box::new(std::iter::once('"')),
                '\u{00AB}' | '\u{00BB}' => Box::new(std::iter::once('"')),
                '\u{2018}' | '\u{2019}' => Box::new(std::iter::once('\'')),
                '\u{2013}' | '\u{2014}' => Box::new(std::iter::once('-')),
                '\u{00A0}' => Box::new(std::iter::once(' ')),
                '\u{2026}' => Box::new("...".chars()),
                other => Box::new(std::iter::once(other)),
            }
        })
        .collect()
}

/// Trim a line and collapse interior whitespace runs to single spaces
fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical normalization used for fingerprinting: Unicode substitution,
/// per-line trim and whitespace collapse, blank lines removed, lines
/// rejoined with `\n` and no trailing newline.
pub fn normalize_for_fingerprint(text: &str) -> String {
    substitute_unicode(text)
        .lines()
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display-only normalization: the same per-line pass but blank lines are
/// preserved. Never use this as hash input.
pub fn normalize_for_display(text: &str) -> String {
    text.lines().map(normalize_line).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_leading_and_trailing_whitespace() {
        assert_eq!(normalize_for_fingerprint("  Hello World  "), "Hello World");
    }

    #[test]
    fn test_collapses_interior_whitespace() {
        assert_eq!(normalize_for_fingerprint("Hello    World"), "Hello World");
        assert_eq!(normalize_for_fingerprint("Hello\t \tWorld"), "Hello World");
    }

    #[test]
    fn test_fingerprint_normalization_drops_blank_lines() {
        assert_eq!(normalize_for_fingerprint("Line 1\n\nLine 2"), "Line 1\nLine 2");
        assert_eq!(normalize_for_fingerprint("Line 1\n   \nLine 2"), "Line 1\nLine 2");
    }

    #[test]
    fn test_display_normalization_keeps_blank_lines() {
        assert_eq!(normalize_for_display("Line 1\n\nLine 2"), "Line 1\n\nLine 2");
        assert_eq!(normalize_for_display("  a  \n\n  b  "), "a\n\nb");
    }

    #[test]
    fn test_no_trailing_newline() {
        assert_eq!(normalize_for_fingerprint("Line 1\nLine 2\n"), "Line 1\nLine 2");
    }

    #[test]
    fn test_curly_quotes_become_straight() {
        assert_eq!(normalize_for_fingerprint("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(normalize_for_fingerprint("\u{2018}single\u{2019}"), "'single'");
        assert_eq!(normalize_for_fingerprint("\u{00AB}angle\u{00BB}"), "\"angle\"");
    }

    #[test]
    fn test_dashes_nbsp_and_ellipsis() {
        assert_eq!(normalize_for_fingerprint("a \u{2013} b \u{2014} c"), "a - b - c");
        assert_eq!(normalize_for_fingerprint("non\u{00A0}breaking"), "non breaking");
        assert_eq!(normalize_for_fingerprint("wait\u{2026}"), "wait...");
    }

    #[test]
    fn test_equal_inputs_after_noise_normalize_identically() {
        let clean = "Unseen University\nDoctor of Philosophy";
        let noisy = "  Unseen   University  \n\nDoctor\tof  Philosophy\n";
        assert_eq!(
            normalize_for_fingerprint(clean),
            normalize_for_fingerprint(noisy)
        );
    }
}
