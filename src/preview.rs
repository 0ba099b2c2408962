//! PNG preview generation
//!
//! A drawing's preview is written next to it (`canvas.tldr` → `canvas.png`).
//! An external converter is tried first; if it is unavailable or fails, the
//! PNG data URL embedded in the drawing's JSON is decoded instead.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{DATA_URL_PREFIX, PNG_DATA_URL_HEADER, PNG_EXTENSION};
use crate::error::{Error, Result};
use crate::util;

/// How long to wait for converter output once the process has exited
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// External drawing-to-PNG converter
pub trait PngConvert: std::fmt::Debug {
    /// Whether the converter can run at all
    fn supported(&self) -> bool;
    /// Write a PNG rendering of `source` to `dest`
    fn convert(&self, source: &Path, dest: &Path) -> Result<()>;
}

/// Runs `<interpreter> <script> <source> <dest>` with a timeout
#[derive(Debug, Clone)]
pub struct NodeConverter {
    pub interpreter: Option<PathBuf>,
    pub script: PathBuf,
    pub timeout: Duration,
}

impl NodeConverter {
    pub fn new(interpreter: Option<PathBuf>, script: PathBuf, timeout: Duration) -> Self {
        Self { interpreter, script, timeout }
    }
}

impl PngConvert for NodeConverter {
    fn supported(&self) -> bool {
        self.interpreter.is_some() && self.script.exists()
    }

    fn convert(&self, source: &Path, dest: &Path) -> Result<()> {
        let interpreter = self
            .interpreter
            .as_ref()
            .ok_or_else(|| Error::conversion("No interpreter available"))?;

        let mut child = Command::new(interpreter)
            .arg(&self.script)
            .arg(source)
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::conversion(format!("Failed to launch {}: {}", interpreter.display(), e))
            })?;

        // Drain both pipes on their own threads so a chatty child cannot block
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Background processes of the converter may still hold the
                    // pipes open; the reader threads are left to finish on their own.
                    return Err(Error::conversion(format!(
                        "Converter timed out after {:?}",
                        self.timeout
                    )));
                }
                None => thread::sleep(Duration::from_millis(50)),
            }
        };

        let output_deadline = Instant::now() + OUTPUT_GRACE;
        let stdout = collect_output(stdout, output_deadline);
        let stderr = collect_output(stderr, output_deadline);

        if !status.success() {
            let details = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or("Unknown error");
            return Err(Error::conversion(details.to_string()));
        }

        if !dest.exists() {
            let script_name = self
                .script
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(Error::conversion(format!(
                "{} finished but did not create an output file",
                script_name
            )));
        }

        Ok(())
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Output of an exited converter. A pipe still held open by a leftover
/// background process yields nothing once `deadline` has passed.
fn collect_output(reader: Option<mpsc::Receiver<String>>, deadline: Instant) -> String {
    reader
        .and_then(|rx| rx.recv_timeout(deadline.saturating_duration_since(Instant::now())).ok())
        .unwrap_or_default()
}

/// Produces fresh PNG previews for drawing files
#[derive(Debug)]
pub struct PreviewGenerator {
    converter: Option<Box<dyn PngConvert>>,
    force: bool,
}

impl PreviewGenerator {
    pub fn new(converter: Option<Box<dyn PngConvert>>, force: bool) -> Self {
        Self { converter, force }
    }

    /// Path the preview for `source` is written to
    pub fn png_path(source: &Path) -> PathBuf {
        source.with_extension(PNG_EXTENSION)
    }

    /// Return a fresh PNG for `source`, regenerating it if needed
    pub fn export_png(&self, source: &Path) -> Result<PathBuf> {
        let png_path = Self::png_path(source);

        if !self.needs_refresh(source, &png_path)? {
            debug!(png = %png_path.display(), "preview is up to date");
            return Ok(png_path);
        }

        if let Some(converter) = self.converter.as_ref().filter(|c| c.supported()) {
            match converter.convert(source, &png_path) {
                Ok(()) => return Ok(png_path),
                Err(e) => warn!(
                    "Node-based export failed for '{}': {}. Falling back to embedded preview.",
                    source.display(),
                    e
                ),
            }
        }

        extract_embedded_preview(source, &png_path)?;
        Ok(png_path)
    }

    fn needs_refresh(&self, source: &Path, png_path: &Path) -> Result<bool> {
        if self.force || !png_path.exists() {
            return Ok(true);
        }
        let source_mtime = fs::metadata(source)?.modified()?;
        let png_mtime = fs::metadata(png_path)?.modified()?;
        Ok(source_mtime > png_mtime)
    }
}

/// Decode the first PNG data URL found in the drawing's JSON into `png_path`
pub fn extract_embedded_preview(source: &Path, png_path: &Path) -> Result<()> {
    let content = fs::read_to_string(source)?;
    let data: Value = serde_json::from_str(&content).map_err(|e| Error::InvalidJson {
        path: source.to_path_buf(),
        source: e,
    })?;

    let data_url = find_data_url(&data, DATA_URL_PREFIX).ok_or_else(|| Error::NoEmbeddedPreview {
        path: source.to_path_buf(),
    })?;

    let png_bytes = decode_png_data_url(data_url, source)?;
    util::write_atomic(png_path, &png_bytes)?;
    debug!(png = %png_path.display(), bytes = png_bytes.len(), "wrote embedded preview");
    Ok(())
}

/// First string value starting with `prefix`, searched depth-first through
/// objects and arrays
pub fn find_data_url<'a>(value: &'a Value, prefix: &str) -> Option<&'a str> {
    match value {
        Value::String(s) if s.starts_with(prefix) => Some(s.as_str()),
        Value::Object(map) => map.values().find_map(|v| find_data_url(v, prefix)),
        Value::Array(items) => items.iter().find_map(|v| find_data_url(v, prefix)),
        _ => None,
    }
}

fn decode_png_data_url(data_url: &str, source: &Path) -> Result<Vec<u8>> {
    let (header, payload) = data_url.split_once(',').unwrap_or((data_url, ""));
    if !header.starts_with(PNG_DATA_URL_HEADER) {
        return Err(Error::UnsupportedFormat {
            path: source.to_path_buf(),
            header: header.to_string(),
        });
    }

    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(payload.as_bytes()).map_err(|e| Error::InvalidPayload {
        path: source.to_path_buf(),
        source: e,
    })
}
