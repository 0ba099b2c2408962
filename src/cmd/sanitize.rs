use std::path::Path;

use obsidian_pandoc_prep::{sanitize_markdown, util, Result};

pub fn run(file: &str) -> Result<()> {
    util::transform_file(Path::new(file), sanitize_markdown)?;
    println!("{} sanitized and saved.", file);
    Ok(())
}
