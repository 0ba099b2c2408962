use clap::{Args, Parser, Subcommand};

/// obsidian-pandoc-prep - Prepare Obsidian notes for Pandoc/LaTeX
///
/// # Quick Reference
///
/// ## Drawings
///
/// ```bash
/// obsidian-pandoc-prep export-tldraw note.md                 # ![[x.tldr]] → ![x](x.png){...}
/// obsidian-pandoc-prep export-tldraw note.md --force         # Regenerate every PNG
/// obsidian-pandoc-prep export-tldraw note.md -s ~/drawings   # Extra search directory
/// obsidian-pandoc-prep restore-embeds note.md                # ![x](x.png){...} → ![[x.tldr]]
/// ```
///
/// ## Math
///
/// ```bash
/// obsidian-pandoc-prep sanitize note.md        # Heading spacing, strip $$ around align
/// obsidian-pandoc-prep restore-math note.md    # Wrap align/gather/multline in $$ again
/// ```
///
/// ## Environment Variables
///
/// - `TLDRAW_SEARCH_DIRS`: Extra search directories (path-separated, before --search-dir)
/// - `TLDRAW_CONVERTER_SCRIPT`: Converter script (default: tldraw_convert.mjs next to the binary)
/// - `TLDRAW_NODE`: Interpreter for the converter (default: node on PATH)
/// - `RUST_LOG`: Log filter (overrides --verbose/--quiet)
#[derive(Parser, Debug)]
#[command(name = "obsidian-pandoc-prep")]
#[command(version)]
#[command(about = "Prepare Obsidian notes for a Pandoc/LaTeX pipeline")]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export embedded tldraw drawings to PNG and rewrite the embeds
    #[command(alias = "export")]
    ExportTldraw(ExportArgs),

    /// Wrap align/gather/multline environments in $$ again
    RestoreMath {
        /// Markdown file to rewrite in place
        file: String,
    },

    /// Space out headings and strip $$ around align/gather/multline
    Sanitize {
        /// Markdown file to rewrite in place
        file: String,
    },

    /// Turn exported drawing images back into ![[...]] embeds
    RestoreEmbeds {
        /// Markdown file to rewrite in place
        file: String,
    },
}

/// Arguments of `export-tldraw`
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Markdown note that may contain ![[...tldr]] embeds
    pub markdown_file: String,

    /// Additional directory to search for .tldr files (repeatable)
    #[arg(short = 's', long = "search-dir", value_name = "DIR")]
    pub search_dirs: Vec<String>,

    /// Re-export PNG files even if they are up to date
    #[arg(short, long)]
    pub force: bool,

    /// Converter script run by the interpreter
    #[arg(long, value_name = "PATH")]
    pub converter_script: Option<String>,

    /// Interpreter for the converter script
    #[arg(long, value_name = "PATH")]
    pub node: Option<String>,

    /// Seconds before the converter is killed
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}
