//! WebVTT segment validation utilities

use std::sync::OnceLock;

use regex::Regex;

fn cue_timing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})\.(\d{3}) --> (\d{2,}):(\d{2}):(\d{2})\.(\d{3})( .*)?$")
            .unwrap()
    })
}

fn to_ms(caps: &regex::Captures<'_>, first: usize) -> u64 {
    let field = |i: usize| caps[first + i].parse::<u64>().unwrap_or(0);
    field(0) * 3_600_000 + field(1) * 60_000 + field(2) * 1000 + field(3)
}

/// Validate a WebVTT segment produced from a DFXP track
pub fn validate_webvtt(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Check for WEBVTT header
    if !content.starts_with("WEBVTT\r\n\r\n") {
        errors.push("Missing WEBVTT header".to_string());
    }

    let mut previous_start = 0;
    let mut cues = 0;
    for line in content.lines() {
        if !line.contains("-->") {
            continue;
        }
        cues += 1;

        let Some(caps) = cue_timing_pattern().captures(line) else {
            errors.push(format!("Invalid cue timestamp format: {}", line));
            continue;
        };

        let start = to_ms(&caps, 1);
        let end = to_ms(&caps, 5);
        if end < start {
            errors.push(format!("Cue ends before it starts: {}", line));
        }
        if start < previous_start {
            warnings.push(format!("Cue out of order: {}", line));
        }
        previous_start = start;
    }

    if cues > 0 && !content.ends_with("\n\n") {
        errors.push("Last cue is not terminated by a blank line".to_string());
    }

    if let Err(e) = check_tag_balance(content) {
        errors.push(e);
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Decoration tags must close in the reverse order they were opened
pub fn check_tag_balance(content: &str) -> Result<(), String> {
    let mut open: Vec<&str> = Vec::new();
    let mut rest = content;

    while let Some(pos) = rest.find('<') {
        rest = &rest[pos..];
        let tag = ["<b>", "<i>", "<u>", "</b>", "</i>", "</u>"]
            .into_iter()
            .find(|t| rest.starts_with(t));
        match tag {
            Some(t) if t.starts_with("</") => {
                let name = &t[2..3];
                if open.pop() != Some(name) {
                    return Err(format!("Unbalanced closing tag {}", t));
                }
                rest = &rest[t.len()..];
            }
            Some(t) => {
                open.push(&t[1..2]);
                rest = &rest[t.len()..];
            }
            None => rest = &rest[1..],
        }
    }

    match open.last() {
        Some(name) => Err(format!("Unclosed tag <{}>", name)),
        None => Ok(()),
    }
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[allow(dead_code)]
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_webvtt() {
        let content = "WEBVTT\r\n\r\n00:00:01.000 --> 00:00:03.000 line:100%\n<b>Hello</b> World\n\n";
        let result = validate_webvtt(content);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_validate_webvtt_missing_header() {
        let content = "00:00:01.000 --> 00:00:03.000\nHello\n\n";
        let result = validate_webvtt(content);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_validate_webvtt_bad_timing() {
        let result = validate_webvtt("WEBVTT\r\n\r\n00:00:01 --> 00:00:03.000\nHello\n\n");
        assert!(!result.is_valid);

        let result = validate_webvtt("WEBVTT\r\n\r\n00:00:03.000 --> 00:00:01.000\nHello\n\n");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_tag_balance() {
        assert!(check_tag_balance("<b><i>x</i></b>").is_ok());
        assert!(check_tag_balance("a < b").is_ok());
        assert!(check_tag_balance("<b><i>x</b></i>").is_err());
        assert!(check_tag_balance("<u>x").is_err());
    }

    #[test]
    fn test_validation_result() {
        let success = ValidationResult::success();
        assert!(success.is_valid);
        assert!(success.errors.is_empty());

        let fail = ValidationResult::fail("test error");
        assert!(!fail.is_valid);
        assert_eq!(fail.errors.len(), 1);
    }
}
