//! Placeholder inspection

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use quill_template::{codec, find_markers, MarkerMatch};

use super::load_template;

/// Arguments for `quill markers`
#[derive(Args, Debug)]
pub struct MarkersArgs {
    /// Document template file
    #[arg(short, long)]
    pub template: PathBuf,

    /// Treat the template file as raw HTML instead of a data: resource
    #[arg(long)]
    pub html: bool,
}

/// Execute `quill markers`
pub fn execute(args: MarkersArgs) -> Result<()> {
    let resource = load_template(&args.template, args.html)?;
    let text = codec::decode(&resource)?;

    let found = find_markers(&text);
    if found.is_empty() {
        println!("No placeholders found");
        return Ok(());
    }

    for line in describe(&text, &found) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per marker: byte range, role, marker kind and the matched text.
fn describe(text: &str, found: &[MarkerMatch]) -> Vec<String> {
    found
        .iter()
        .map(|m| {
            format!(
                "{:>6}..{:<6} {:<9} {:<20} {:?}",
                m.range.start,
                m.range.end,
                m.role.as_str(),
                m.marker,
                &text[m.range.clone()]
            )
        })
        .collect()
}
