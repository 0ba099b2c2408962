//! Export tldraw embeds command module

use obsidian_pandoc_prep::{ExportArgs, ExportConfig, Result, TldrawExporter};
use tracing::info;

pub fn run(args: &ExportArgs) -> Result<()> {
    let config = ExportConfig::from_args(args)?;
    let mut exporter = TldrawExporter::from_config(&config)?;
    let report = exporter.run()?;

    if report.found > 0 {
        info!(
            "{}: {} embed(s), {} converted, {} left unchanged",
            config.note_path.display(),
            report.found,
            report.converted,
            report.skipped
        );
    }
    Ok(())
}
