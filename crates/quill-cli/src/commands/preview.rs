//! Live preview rendering

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use quill_ink::StrokeCapture;
use quill_template::{codec, substitute};
use quill_types::{ArtifactRole, EncodedArtifact};
use tracing::{info, warn};

use super::{emit, load_strokes, load_template};
use crate::config::QuillConfig;

/// Arguments for `quill preview`
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Document template file
    #[arg(short, long)]
    pub template: PathBuf,

    /// Treat the template file as raw HTML instead of a data: resource
    #[arg(long)]
    pub html: bool,

    /// Recorded signature strokes (JSON)
    #[arg(short, long)]
    pub signature: Option<PathBuf>,

    /// Recorded initials strokes (JSON)
    #[arg(short, long)]
    pub initials: Option<PathBuf>,

    /// Print decoded HTML instead of the data: resource
    #[arg(long)]
    pub decode: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Execute `quill preview`
pub fn execute(args: PreviewArgs, config: &QuillConfig) -> Result<()> {
    let resource = load_template(&args.template, args.html)?;
    let signature = artifact(ArtifactRole::Signature, args.signature.as_ref(), config)?;
    let initials = artifact(ArtifactRole::Initials, args.initials.as_ref(), config)?;

    let result = substitute(&resource, signature.as_ref(), initials.as_ref());
    info!(
        signature_replacements = result.signature_replacements,
        initials_replacements = result.initials_replacements,
        passed_through = result.passed_through,
        "Preview rendered"
    );

    let output = if args.decode && !result.passed_through {
        codec::decode(&result.resource)?
    } else {
        if args.decode {
            warn!("Template is not a text document, emitting it unchanged");
        }
        result.resource
    };
    emit(&output, args.out.as_deref())
}

fn artifact(
    role: ArtifactRole,
    strokes: Option<&PathBuf>,
    config: &QuillConfig,
) -> Result<Option<EncodedArtifact>> {
    let Some(path) = strokes else {
        return Ok(None);
    };

    let strokes = load_strokes(path)?;
    let capture = StrokeCapture::replay(role, config.capture.for_role(role).clone(), &strokes)?;
    Ok(capture.encoded().cloned())
}
