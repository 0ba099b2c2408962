//! Restore drawing embeds command module
//!
//! Reverses `export-tldraw`: images carrying a `data-tldraw-embed` attribute
//! become `![[...]]` embeds again.

use std::path::Path;

use obsidian_pandoc_prep::{restore_embeds, util, Result};

pub fn run(file: &str) -> Result<()> {
    util::transform_file(Path::new(file), restore_embeds)?;
    println!("{} embeds restored.", file);
    Ok(())
}
