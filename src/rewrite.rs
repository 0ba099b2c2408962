//! Note rewriting
//!
//! Builds the Markdown image that replaces an exported embed, splices
//! replacements into the note, and reverses the rewrite.

use std::ops::Range;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::constants::EMBED_ATTRIBUTE;
use crate::embed::{decode_original, encode_original, Embed};
use crate::util::display_path;

// The link target may hold one level of balanced parentheses, as in
// `Flow (v2).png`; an unbalanced `)` ends it.
static REWRITTEN_IMAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"!\[[^\]]*\]\((?:[^()\n]|\([^()\n]*\))*\)\{{{}="([A-Za-z0-9_\-=]*)"\}}"#,
        regex::escape(EMBED_ATTRIBUTE)
    ))
    .expect("rewritten image pattern is valid")
});

/// Markdown image for an exported embed:
/// `![alt](relative.png){data-tldraw-embed="<base64url>"}`
pub fn build_markdown_image(embed: &Embed, png_path: &Path, note_dir: &Path) -> String {
    let alt = embed.alt_text().replace('"', "'");
    let relative_png = pathdiff::diff_paths(png_path, note_dir)
        .map(|rel| display_path(&rel))
        .unwrap_or_else(|| display_path(png_path));
    format!(
        "![{}]({}){{{}=\"{}\"}}",
        alt,
        relative_png,
        EMBED_ATTRIBUTE,
        encode_original(&embed.original)
    )
}

/// Replace spans of `original` with new text.
///
/// Spans must be in ascending order and disjoint; text between spans is
/// copied unchanged.
pub fn splice(original: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;
    for (span, text) in replacements {
        debug_assert!(span.start >= cursor, "spans must be ascending and disjoint");
        output.push_str(&original[cursor..span.start]);
        output.push_str(text);
        cursor = span.end;
    }
    output.push_str(&original[cursor..]);
    output
}

/// Turn rewritten images back into `![[...]]` embeds.
///
/// Attributes that do not decode are left as they are.
pub fn restore_embeds(text: &str) -> String {
    REWRITTEN_IMAGE_PATTERN
        .replace_all(text, |caps: &Captures| match decode_original(&caps[1]) {
            Some(original) => format!("![[{}]]", original),
            None => {
                warn!(
                    "Could not decode {} value '{}'. Leaving image unchanged.",
                    EMBED_ATTRIBUTE, &caps[1]
                );
                caps[0].to_string()
            }
        })
        .into_owned()
}
