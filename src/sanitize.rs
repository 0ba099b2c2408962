//! Markdown sanitizing before conversion
//!
//! Two passes over the whole document, in order:
//! 1. blank lines around ATX headings
//! 2. `$$` removed around align-like environments

use once_cell::sync::Lazy;
use regex::Regex;

use crate::math::strip_math_delimiters;

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#{1,6}\s+\S").expect("heading pattern is valid"));

/// Check if a line is an ATX heading (one to six `#`, whitespace, content)
pub fn is_heading(line: &str) -> bool {
    HEADING_LINE.is_match(line)
}

/// Insert a blank line before a heading when the previous output line is not
/// blank, and after it when the next input line is not blank.
///
/// A trailing newline in the input is preserved.
pub fn space_headings(input: &str) -> String {
    let lines: Vec<&str> = input.lines().collect();
    let mut output: Vec<&str> = Vec::with_capacity(lines.len() + 4);
    let mut previous_blank = true;

    for (i, &line) in lines.iter().enumerate() {
        if is_heading(line) {
            if !previous_blank {
                output.push("");
            }
            output.push(line);
            let next_has_content = lines.get(i + 1).is_some_and(|next| !next.trim().is_empty());
            if next_has_content {
                output.push("");
            }
            previous_blank = next_has_content;
        } else {
            output.push(line);
            previous_blank = line.trim().is_empty();
        }
    }

    let suffix = if input.ends_with('\n') { "\n" } else { "" };
    output.join("\n") + suffix
}

/// Apply heading spacing, then strip `$$` around align-like environments
pub fn sanitize_markdown(input: &str) -> String {
    strip_math_delimiters(&space_headings(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::restore_math_blocks;

    #[test]
    fn test_is_heading() {
        assert!(is_heading("# Title"));
        assert!(is_heading("  ###### Deep"));
        assert!(!is_heading("####### Too deep"));
        assert!(!is_heading("#hashtag"));
        assert!(!is_heading("# "));
        assert!(!is_heading("text # not heading"));
    }

    #[test]
    fn test_heading_spacing() {
        assert_eq!(sanitize_markdown("text\n# Heading\nmore"), "text\n\n# Heading\n\nmore");
    }

    #[test]
    fn test_already_spaced_is_unchanged() {
        let input = "# Title\n\nBody\n\n## Section\n\nText\n";
        assert_eq!(sanitize_markdown(input), input);
    }

    #[test]
    fn test_consecutive_headings() {
        assert_eq!(space_headings("# A\n## B\ntext"), "# A\n\n## B\n\ntext");
    }

    #[test]
    fn test_heading_at_end() {
        assert_eq!(space_headings("para\n# End"), "para\n\n# End");
        assert_eq!(space_headings("para\n# End\n"), "para\n\n# End\n");
    }

    #[test]
    fn test_sanitize_strips_math_after_spacing() {
        let input = "# Math\n$$\n\\begin{gather}\nx\n\\end{gather}\n$$\n";
        assert_eq!(
            sanitize_markdown(input),
            "# Math\n\n\\begin{gather}\nx\n\\end{gather}\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let input = "intro\n# H\ntext\n$$\n\\begin{align}\na\n\\end{align}\n$$\n";
        let once = sanitize_markdown(input);
        assert_eq!(sanitize_markdown(&once), once);
    }

    #[test]
    fn test_sanitize_then_restore() {
        let wrapped = "Intro\n\n$$\n\\begin{align}\na &= b\n\\end{align}\n$$\n\nOutro\n";
        let sanitized = sanitize_markdown(wrapped);
        assert_eq!(sanitized, "Intro\n\n\\begin{align}\na &= b\n\\end{align}\n\nOutro\n");
        assert_eq!(restore_math_blocks(&sanitized), wrapped);
    }
}
