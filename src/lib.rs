pub mod cli;
pub mod config;
pub mod constants;
pub mod embed;
pub mod error;
pub mod export;
pub mod math;
pub mod preview;
pub mod resolver;
pub mod rewrite;
pub mod sanitize;
pub mod util;

pub use cli::{Cli, Command, ExportArgs};
pub use config::ExportConfig;
pub use embed::{iter_embeds, Embed};
pub use error::{Error, ErrorKind, Result};
pub use export::{ExportReport, TldrawExporter};
pub use math::{restore_math_blocks, strip_math_delimiters};
pub use preview::{NodeConverter, PngConvert, PreviewGenerator};
pub use resolver::{FileResolver, SearchPath};
pub use rewrite::{build_markdown_image, restore_embeds};
pub use sanitize::sanitize_markdown;
