//! TldrawExporter - drawing embed export workflow
//!
//! For each `![[...tldr]]` embed in a note:
//! 1. resolve the drawing file
//! 2. produce a fresh PNG preview next to it
//! 3. replace the embed with a Markdown image carrying the original embed
//!
//! Embeds that fail at any step are left unchanged and reported as warnings.
//! The note is written back once, and only if its content changed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::embed::{iter_embeds, Embed};
use crate::error::Result;
use crate::preview::{PngConvert, PreviewGenerator};
use crate::resolver::{FileResolver, SearchPath};
use crate::rewrite::{build_markdown_image, splice};
use crate::util;

/// Summary of one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Embeds found in the note
    pub found: usize,
    /// Embeds replaced by an image
    pub converted: usize,
    /// Embeds left unchanged after a failure
    pub skipped: usize,
    /// Whether the note file was rewritten
    pub note_updated: bool,
}

pub struct TldrawExporter {
    note_path: PathBuf,
    note_dir: PathBuf,
    resolver: FileResolver,
    previews: PreviewGenerator,
}

impl TldrawExporter {
    /// Create an exporter for `note_path` (absolute).
    /// The search path is fixed here: note directory, `search_dirs`, `cwd`.
    pub fn new(
        note_path: &Path,
        search_dirs: &[PathBuf],
        cwd: &Path,
        converter: Option<Box<dyn PngConvert>>,
        force: bool,
    ) -> Self {
        let note_dir = note_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let search_path = SearchPath::new(&note_dir, search_dirs, cwd);
        Self {
            note_path: note_path.to_path_buf(),
            note_dir,
            resolver: FileResolver::new(search_path),
            previews: PreviewGenerator::new(converter, force),
        }
    }

    /// Create an exporter from a resolved configuration
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let converter: Box<dyn PngConvert> = Box::new(config.converter.to_converter());
        Ok(Self::new(
            &config.note_path,
            &config.search_dirs,
            &cwd,
            Some(converter),
            config.force,
        ))
    }

    /// Rewrite the note text, returning the new text and a report.
    /// Does not touch the note file.
    pub fn rewrite(&mut self, text: &str) -> (String, ExportReport) {
        let mut report = ExportReport::default();
        let mut replacements = Vec::new();

        for embed in iter_embeds(text) {
            report.found += 1;
            match self.export_embed(&embed) {
                Some(image) => {
                    report.converted += 1;
                    replacements.push((embed.span, image));
                }
                None => report.skipped += 1,
            }
        }

        (splice(text, &replacements), report)
    }

    /// Export every embed in the note and write the note back if it changed
    pub fn run(&mut self) -> Result<ExportReport> {
        let original = fs::read_to_string(&self.note_path)?;
        let (updated, mut report) = self.rewrite(&original);

        if updated != original {
            util::write_atomic(&self.note_path, updated.as_bytes())?;
            report.note_updated = true;
            info!("Updated {}", self.note_path.display());
        }

        Ok(report)
    }

    /// Image replacement for one embed, or `None` after logging a warning
    fn export_embed(&mut self, embed: &Embed) -> Option<String> {
        let tldr_path = match self.resolver.resolve(&embed.file_reference) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}. Leaving embed unchanged.", e);
                return None;
            }
        };

        let png_path = match self.previews.export_png(&tldr_path) {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to export '{}': {}", embed.file_reference, e);
                return None;
            }
        };

        debug!(embed = %embed.original, png = %png_path.display(), "exported embed");
        Some(build_markdown_image(embed, &png_path, &self.note_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::decode_original;
    use crate::preview::tests::FakeConverter;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    const DRAWING: &str =
        r#"{"document":{"assets":[{"props":{"src":"data:image/png;base64,iVBORw0KGgo="}}]}}"#;

    fn setup(note: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let note_path = temp_dir.path().join("note.md");
        fs::write(&note_path, note).unwrap();
        fs::write(temp_dir.path().join("draw.tldr"), DRAWING).unwrap();
        (temp_dir, note_path)
    }

    fn exporter(
        temp_dir: &TempDir,
        note_path: &Path,
        converter: Option<Box<dyn PngConvert>>,
    ) -> TldrawExporter {
        TldrawExporter::new(note_path, &[], temp_dir.path(), converter, false)
    }

    #[test]
    fn test_export_with_alias() {
        let (temp_dir, note_path) = setup("Fig: ![[draw.tldr|My Drawing]]");
        let report = exporter(&temp_dir, &note_path, None).run().unwrap();

        assert_eq!(report, ExportReport { found: 1, converted: 1, skipped: 0, note_updated: true });
        let updated = fs::read_to_string(&note_path).unwrap();
        assert!(updated.starts_with("Fig: ![My Drawing](draw.png){data-tldraw-embed=\""));

        let encoded = updated.split('"').nth(1).unwrap();
        assert_eq!(decode_original(encoded).as_deref(), Some("draw.tldr|My Drawing"));
        assert_eq!(fs::read(temp_dir.path().join("draw.png")).unwrap().len(), 8);
    }

    #[test]
    fn test_unresolved_embed_left_unchanged() {
        let note = "a ![[missing]] b ![[draw]] c";
        let (temp_dir, note_path) = setup(note);
        let (updated, report) = exporter(&temp_dir, &note_path, None).rewrite(note);

        assert_eq!(report.found, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.skipped, 1);
        assert!(updated.starts_with("a ![[missing]] b ![draw](draw.png){"));
        assert!(updated.ends_with("} c"));
    }

    #[test]
    fn test_failed_preview_left_unchanged() {
        let note = "![[empty.tldr]]";
        let (temp_dir, note_path) = setup(note);
        fs::write(temp_dir.path().join("empty.tldr"), "{}").unwrap();

        let report = exporter(&temp_dir, &note_path, None).run().unwrap();
        assert_eq!(report.skipped, 1);
        assert!(!report.note_updated);
        assert_eq!(fs::read_to_string(&note_path).unwrap(), note);
    }

    #[test]
    fn test_no_embeds_no_write() {
        let (temp_dir, note_path) = setup("plain text");
        let report = exporter(&temp_dir, &note_path, None).run().unwrap();
        assert_eq!(report, ExportReport::default());
    }

    #[test]
    fn test_second_run_is_noop() {
        let (temp_dir, note_path) = setup("![[draw]]\n![[draw.tldr|Again]]\n");
        exporter(&temp_dir, &note_path, None).run().unwrap();
        let first = fs::read_to_string(&note_path).unwrap();

        let calls = Rc::new(Cell::new(0));
        let converter = FakeConverter { calls: calls.clone(), succeed: true };
        let report = exporter(&temp_dir, &note_path, Some(Box::new(converter))).run().unwrap();

        assert_eq!(report.found, 0);
        assert!(!report.note_updated);
        assert_eq!(calls.get(), 0);
        assert_eq!(fs::read_to_string(&note_path).unwrap(), first);
    }

    #[test]
    fn test_drawing_in_search_dir() {
        let temp_dir = TempDir::new().unwrap();
        let notes = temp_dir.path().join("notes");
        let drawings = temp_dir.path().join("drawings");
        fs::create_dir_all(&notes).unwrap();
        fs::create_dir_all(&drawings).unwrap();
        fs::write(drawings.join("flow.tldr"), DRAWING).unwrap();
        let note_path = notes.join("note.md");
        fs::write(&note_path, "![[flow]]").unwrap();

        let mut exporter =
            TldrawExporter::new(&note_path, &[drawings.clone()], &notes, None, false);
        exporter.run().unwrap();

        let updated = fs::read_to_string(&note_path).unwrap();
        assert!(updated.starts_with("![flow](../drawings/flow.png){"));
        assert!(drawings.join("flow.png").exists());
    }
}
