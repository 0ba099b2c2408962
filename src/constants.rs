//! Constants for obsidian-pandoc-prep
//!
//! File extensions, markers, environment variable names and message fragments
//! shared by the export workflow and the math normalization passes.

// === File Extensions ===

/// Extension of tldraw drawing source files (without dot)
pub const TLDR_EXTENSION: &str = "tldr";

/// Extension of generated previews (without dot)
pub const PNG_EXTENSION: &str = "png";

// === Embed Syntax ===

/// Data URL prefix searched for in drawing JSON
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Header every accepted data URL must start with
pub const PNG_DATA_URL_HEADER: &str = "data:image/png";

/// Attribute that stores the original embed text on a rewritten image
pub const EMBED_ATTRIBUTE: &str = "data-tldraw-embed";

// === External Converter ===

/// Converter script looked up next to the running executable
pub const CONVERTER_SCRIPT_NAME: &str = "tldraw_convert.mjs";

/// Interpreter looked up on PATH
pub const NODE_EXECUTABLE: &str = "node";

/// Seconds before a converter run is killed
pub const DEFAULT_CONVERTER_TIMEOUT_SECS: u64 = 120;

// === Environment Variables ===

/// Path-separated list of extra search directories
pub const ENV_SEARCH_DIRS: &str = "TLDRAW_SEARCH_DIRS";

/// Converter script override
pub const ENV_CONVERTER_SCRIPT: &str = "TLDRAW_CONVERTER_SCRIPT";

/// Interpreter override
pub const ENV_NODE: &str = "TLDRAW_NODE";

// === Math Environments ===

/// Environments whose display-math delimiters are stripped and restored.
/// Used as a regex alternation.
pub const MATH_ENV_PATTERN: &str = r"align\*?|gather\*?|multline\*?";

/// Display-math delimiter
pub const DISPLAY_MATH_DELIMITER: &str = "$$";

// === Messages ===

/// Remedy hint when a drawing carries no embedded preview
pub const NO_PREVIEW_HINT: &str = "Either install @tldraw/tldraw and rerun, \
     or open the drawing in Obsidian once and export it manually to seed a preview.";
