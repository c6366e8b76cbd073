//! CLI command implementations

pub mod markers;
pub mod preview;
pub mod request;
pub mod sign;

use std::path::Path;

use anyhow::{Context, Result};
use quill_ink::Stroke;
use quill_template::codec;

/// Read a document resource from `path`.
///
/// With `html`, the file holds raw HTML and is wrapped into the percent
/// form. Otherwise it must already be a `data:` resource.
pub fn load_template(path: &Path, html: bool) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template: {}", path.display()))?;

    if html {
        Ok(codec::encode(&raw))
    } else {
        Ok(raw.trim().to_string())
    }
}

/// Read recorded strokes: a JSON array of point arrays.
pub fn load_strokes(path: &Path) -> Result<Vec<Stroke>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read strokes: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid stroke file: {}", path.display()))
}

/// Write `content` to `out`, or to stdout when no path is given.
pub fn emit(content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
