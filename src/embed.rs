//! Embed parsing module
//!
//! Finds Obsidian-style drawing embeds (`![[canvas.tldr]]`) in note text.
//!
//! An embed's inner text may carry:
//! - an alias after `|` (`![[canvas.tldr|My Drawing]]`)
//! - a block or heading fragment after `#` (`![[canvas.tldr#^block]]`)
//!
//! References without the `.tldr` extension get it appended.

use std::ops::Range;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::TLDR_EXTENSION;

static EMBED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("embed pattern is valid"));

/// One embed occurrence in a note
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    /// Inner text of `![[...]]`, trimmed, alias included
    pub original: String,
    /// Referenced file, always ending in `.tldr`
    pub file_reference: String,
    /// Alias text; `None` when absent or blank
    pub alias: Option<String>,
    /// Byte span of the whole `![[...]]` match in the source text
    pub span: Range<usize>,
}

impl Embed {
    /// Base name of the referenced file without extension
    pub fn file_stem(&self) -> String {
        std::path::Path::new(&self.file_reference)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Text shown as the image's alt text
    pub fn alt_text(&self) -> String {
        self.alias.clone().unwrap_or_else(|| self.file_stem())
    }
}

/// Iterate over drawing embeds in document order.
/// Spans never overlap; each call starts a fresh scan.
pub fn iter_embeds(text: &str) -> impl Iterator<Item = Embed> + '_ {
    EMBED_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let inner = caps.get(1)?.as_str().trim();
        let (path_part, alias) = split_reference(inner);
        if path_part.is_empty() {
            return None;
        }

        let file_reference = if has_tldr_extension(path_part) {
            path_part.to_string()
        } else {
            format!("{}.{}", path_part, TLDR_EXTENSION)
        };

        Some(Embed {
            original: inner.to_string(),
            file_reference,
            alias,
            span: whole.range(),
        })
    })
}

/// Split an embed's inner text into the file path and the alias.
///
/// The alias follows the first `|`; a `#` fragment is dropped from the path.
/// A blank alias (`![[file|]]`) is reported as no alias.
pub fn split_reference(reference: &str) -> (&str, Option<String>) {
    let (mut path_part, alias) = match reference.split_once('|') {
        Some((path, alias)) => {
            let alias = alias.trim();
            (path.trim(), (!alias.is_empty()).then(|| alias.to_string()))
        }
        None => (reference, None),
    };

    // Block references such as #^block-id or #Heading
    if let Some((before, _)) = path_part.split_once('#') {
        path_part = before.trim();
    }

    (path_part, alias)
}

/// Case-insensitive check for the `.tldr` suffix
pub fn has_tldr_extension(reference: &str) -> bool {
    let suffix = format!(".{}", TLDR_EXTENSION);
    reference.len() >= suffix.len()
        && reference.is_char_boundary(reference.len() - suffix.len())
        && reference[reference.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
}

/// Encode an embed's inner text for the image attribute (base64url, padded)
pub fn encode_original(original: &str) -> String {
    URL_SAFE.encode(original.as_bytes())
}

/// Decode an attribute value back to the embed's inner text.
/// Returns `None` if it is not valid base64url or not UTF-8.
pub fn decode_original(encoded: &str) -> Option<String> {
    let bytes = URL_SAFE.decode(encoded.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_embed() {
        let text = "Fig: ![[draw.tldr]] end";
        let embeds: Vec<_> = iter_embeds(text).collect();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0].original, "draw.tldr");
        assert_eq!(embeds[0].file_reference, "draw.tldr");
        assert_eq!(embeds[0].alias, None);
        assert_eq!(&text[embeds[0].span.clone()], "![[draw.tldr]]");
    }

    #[test]
    fn test_alias_and_fragment() {
        let text = "![[sub/draw#^block-1|My Drawing]]";
        let embed = iter_embeds(text).next().unwrap();
        assert_eq!(embed.original, "sub/draw#^block-1|My Drawing");
        assert_eq!(embed.file_reference, "sub/draw.tldr");
        assert_eq!(embed.alias.as_deref(), Some("My Drawing"));
        assert_eq!(embed.alt_text(), "My Drawing");
    }

    #[test]
    fn test_extension_appended_and_case_kept() {
        let embeds: Vec<_> = iter_embeds("![[Canvas]] ![[Other.TLDR]]").collect();
        assert_eq!(embeds[0].file_reference, "Canvas.tldr");
        assert_eq!(embeds[1].file_reference, "Other.TLDR");
    }

    #[test]
    fn test_document_order_and_disjoint_spans() {
        let text = "a ![[one.tldr]] b ![[two|Two]] c ![[three.tldr]]";
        let embeds: Vec<_> = iter_embeds(text).collect();
        assert_eq!(embeds.len(), 3);
        for pair in embeds.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
        assert_eq!(&text[embeds[1].span.clone()], "![[two|Two]]");
    }

    #[test]
    fn test_empty_path_skipped() {
        assert_eq!(iter_embeds("![[|alias]] ![[#heading]]").count(), 0);
    }

    #[test]
    fn test_blank_alias_is_no_alias() {
        let embed = iter_embeds("![[draw.tldr| ]]").next().unwrap();
        assert_eq!(embed.alias, None);
        assert_eq!(embed.alt_text(), "draw");
    }

    #[test]
    fn test_rewritten_image_is_not_an_embed() {
        let text = "![draw](draw.png){data-tldraw-embed=\"ZHJhdy50bGRy\"}";
        assert_eq!(iter_embeds(text).count(), 0);
    }

    #[test]
    fn test_encode_decode_original() {
        let original = "folder/ünïcode draw#^x|Alias \"quoted\"";
        let encoded = encode_original(original);
        assert!(!encoded.contains('+') && !encoded.contains('/'));
        assert_eq!(decode_original(&encoded).as_deref(), Some(original));
        assert_eq!(decode_original("not base64!"), None);
    }
}
