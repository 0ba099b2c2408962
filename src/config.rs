//! Export configuration
//!
//! Gathers the settings for one export run from command-line values and
//! environment variable overrides:
//! - `TLDRAW_SEARCH_DIRS`: extra search directories (path-separated list)
//! - `TLDRAW_CONVERTER_SCRIPT`: converter script location
//! - `TLDRAW_NODE`: interpreter used to run the converter
//!
//! Empty environment values are treated as unset.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::ExportArgs;
use crate::constants::{
    CONVERTER_SCRIPT_NAME, DEFAULT_CONVERTER_TIMEOUT_SECS, ENV_CONVERTER_SCRIPT, ENV_NODE,
    ENV_SEARCH_DIRS, NODE_EXECUTABLE,
};
use crate::error::{Error, Result};
use crate::preview::NodeConverter;
use crate::util;

/// Settings for the external converter
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Interpreter; `None` when it could not be located
    pub interpreter: Option<PathBuf>,
    pub script: PathBuf,
    pub timeout: Duration,
}

impl ConverterConfig {
    pub fn to_converter(&self) -> NodeConverter {
        NodeConverter::new(self.interpreter.clone(), self.script.clone(), self.timeout)
    }
}

/// Settings for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Absolute path of the note being processed
    pub note_path: PathBuf,
    /// Extra search directories: environment first, then flags
    pub search_dirs: Vec<PathBuf>,
    /// Regenerate previews even when fresh
    pub force: bool,
    pub converter: ConverterConfig,
}

impl ExportConfig {
    /// Build the configuration from arguments and the process environment.
    ///
    /// Fails with [`Error::FileNotFound`] if the note does not exist.
    pub fn from_args(args: &ExportArgs) -> Result<Self> {
        Self::build(args, |key| std::env::var_os(key))
    }

    /// Same as [`ExportConfig::from_args`] with an explicit environment lookup
    pub fn build(args: &ExportArgs, env: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let note_path = util::absolutize(&args.markdown_file)?;
        if !note_path.is_file() {
            return Err(Error::FileNotFound(note_path));
        }

        let mut search_dirs = Vec::new();
        if let Some(raw) = env(ENV_SEARCH_DIRS) {
            for dir in std::env::split_paths(&raw) {
                let dir = dir.to_string_lossy();
                let dir = dir.trim();
                if !dir.is_empty() {
                    search_dirs.push(util::absolutize(dir)?);
                }
            }
        }
        for dir in &args.search_dirs {
            search_dirs.push(util::absolutize(dir)?);
        }

        let script = match args.converter_script.as_deref() {
            Some(path) => util::absolutize(path)?,
            None => match env(ENV_CONVERTER_SCRIPT) {
                Some(path) => util::absolutize(&path.to_string_lossy())?,
                None => default_converter_script(),
            },
        };

        let interpreter = match args.node.as_deref() {
            Some(node) => locate_interpreter(node),
            None => match env(ENV_NODE) {
                Some(node) => locate_interpreter(&node.to_string_lossy()),
                None => locate_interpreter(NODE_EXECUTABLE),
            },
        };

        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_CONVERTER_TIMEOUT_SECS);
        let timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            note_path,
            search_dirs,
            force: args.force,
            converter: ConverterConfig { interpreter, script, timeout },
        })
    }
}

/// Converter script shipped next to the running executable
fn default_converter_script() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONVERTER_SCRIPT_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONVERTER_SCRIPT_NAME))
}

/// Look up a program on PATH, or accept it as a path if it exists
fn locate_interpreter(program: &str) -> Option<PathBuf> {
    which::which(program).ok().or_else(|| {
        let path = util::expand_user(program);
        path.is_file().then_some(path)
    })
}
