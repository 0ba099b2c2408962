use std::path::Path;

use obsidian_pandoc_prep::{restore_math_blocks, util, Result};

pub fn run(file: &str) -> Result<()> {
    util::transform_file(Path::new(file), restore_math_blocks)?;
    println!("{} math blocks restored with $$", file);
    Ok(())
}
