//! Parsing OCR text into a verification URL and certification body
//!
//! Inside the registration frame, the bottom non-blank line is the
//! verification URL and everything above it is the certification body.

use thiserror::Error;

/// Why OCR text could not be parsed into a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No text found in image")]
    NoText,
    #[error("Bottom line inside the marks must be a verification URL starting with https")]
    NotHttps,
}

/// Verification URL recovered from OCR text, with the line it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    pub url: String,
    pub line_index: usize,
}

/// Find the verification URL on the last non-blank line of OCR text.
///
/// OCR frequently injects spurious spaces inside URLs (sometimes between
/// every letter), so ALL whitespace is stripped from the line before the
/// prefix check. Plain `http` is rejected; only `https` is accepted.
pub fn extract_verification_url(raw_text: &str) -> Result<ExtractedUrl, ParseError> {
    let lines: Vec<&str> = raw_text.lines().map(str::trim).collect();

    let line_index = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .ok_or(ParseError::NoText)?;

    let url: String = lines[line_index]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if !url.to_lowercase().starts_with("https") {
        return Err(ParseError::NotHttps);
    }

    Ok(ExtractedUrl { url, line_index })
}

/// Extract the certification body: every trimmed line before the URL line,
/// with trailing blank lines dropped. Interior blank lines are preserved.
pub fn extract_cert_text(raw_text: &str, url_line_index: usize) -> String {
    let mut lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .take(url_line_index)
        .collect();

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_from_last_line() {
        let raw = "Unseen University\nCollege of High Energy Magic\nDoctor of Philosophy\nhttps://example.com/c";
        let result = extract_verification_url(raw).unwrap();
        assert_eq!(result.url, "https://example.com/c");
        assert_eq!(result.line_index, 3);
    }

    #[test]
    fn test_extract_url_strips_internal_spaces() {
        let raw = "Some certification text\nhttps://example.com /verific/c";
        let result = extract_verification_url(raw).unwrap();
        assert_eq!(result.url, "https://example.com/verific/c");
    }

    #[test]
    fn test_extract_url_letter_by_letter_spacing() {
        let raw = "Text\nh t t p s : / / e x a m p l e . c o m";
        let result = extract_verification_url(raw).unwrap();
        assert_eq!(result.url, "https://example.com");
    }

    #[test]
    fn test_extract_url_skips_trailing_blank_lines() {
        let raw = "Certification\nhttps://example.com\n\n\n";
        let result = extract_verification_url(raw).unwrap();
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.line_index, 1);
    }

    #[test]
    fn test_extract_url_case_insensitive_prefix() {
        let raw = "Body\nHTTPS://EXAMPLE.COM/C";
        let result = extract_verification_url(raw).unwrap();
        assert_eq!(result.url, "HTTPS://EXAMPLE.COM/C");
    }

    #[test]
    fn test_extract_url_empty_input() {
        assert_eq!(extract_verification_url(""), Err(ParseError::NoText));
        assert_eq!(extract_verification_url("\n  \n\t\n"), Err(ParseError::NoText));
    }

    #[test]
    fn test_extract_url_rejects_plain_http() {
        let raw = "Body\nhttp://example.com";
        assert_eq!(extract_verification_url(raw), Err(ParseError::NotHttps));
    }

    #[test]
    fn test_extract_url_rejects_non_url_last_line() {
        let raw = "Just a certificate\nwith no link";
        assert_eq!(extract_verification_url(raw), Err(ParseError::NotHttps));
    }

    #[test]
    fn test_extract_cert_text_before_url() {
        let raw = "Line 1\nLine 2\nhttps://x";
        assert_eq!(extract_cert_text(raw, 2), "Line 1\nLine 2");
    }

    #[test]
    fn test_extract_cert_text_strips_trailing_blanks_keeps_interior() {
        let raw = "Line 1\n\nLine 3\nhttps://x";
        assert_eq!(extract_cert_text(raw, 3), "Line 1\n\nLine 3");

        let raw = "Line 1\nLine 2\n\n\nhttps://x";
        assert_eq!(extract_cert_text(raw, 4), "Line 1\nLine 2");
    }

    #[test]
    fn test_extract_cert_text_trims_lines() {
        let raw = "  padded  \nhttps://x";
        assert_eq!(extract_cert_text(raw, 1), "padded");
    }
}
