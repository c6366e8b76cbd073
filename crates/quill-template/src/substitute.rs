//! Placeholder substitution.
//!
//! Every occurrence of every marker for a role receives the same ink: a
//! template with three signature lines gets three copies of one signature.
//! Roles without an artifact keep their markers, so a half-finished signing
//! still renders a partially substituted document.

use quill_types::{ArtifactRole, EncodedArtifact};
use regex::NoExpand;
use tracing::{debug, warn};

use crate::codec;
use crate::error::CodecError;
use crate::markers::markers_for;

/// Display width cap for an embedded signature.
pub const SIGNATURE_MAX_WIDTH_PX: u32 = 200;

/// Display width cap for embedded initials.
pub const INITIALS_MAX_WIDTH_PX: u32 = 100;

/// Result of substituting over decoded document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSubstitution {
    pub text: String,
    pub signature_replacements: usize,
    pub initials_replacements: usize,
}

/// Result of substituting over a document resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionResult {
    /// Canonical percent-form resource, or the untouched input on fallback
    pub resource: String,
    pub signature_replacements: usize,
    pub initials_replacements: usize,
    /// True when the resource could not be decoded and was returned as-is
    pub passed_through: bool,
}

impl SubstitutionResult {
    pub fn replacements(&self, role: ArtifactRole) -> usize {
        match role {
            ArtifactRole::Signature => self.signature_replacements,
            ArtifactRole::Initials => self.initials_replacements,
        }
    }
}

pub fn max_width_px(role: ArtifactRole) -> u32 {
    match role {
        ArtifactRole::Signature => SIGNATURE_MAX_WIDTH_PX,
        ArtifactRole::Initials => INITIALS_MAX_WIDTH_PX,
    }
}

/// Embedded-image fragment for one artifact: the image inside a
/// bottom-bordered block that reads as a signed line.
pub fn fragment(role: ArtifactRole, artifact: &EncodedArtifact) -> String {
    format!(
        concat!(
            r#"<div style="display:inline-block;border-bottom:1px solid #000;padding:0 4px 2px;">"#,
            r#"<img src="{src}" alt="{role}" style="max-width:{width}px;height:auto;display:block;" />"#,
            "</div>"
        ),
        src = artifact.data_uri(),
        role = role,
        width = max_width_px(role),
    )
}

/// Replace markers in decoded text. Pure; never touches a role whose
/// artifact is `None`.
pub fn substitute_text(
    text: &str,
    signature: Option<&EncodedArtifact>,
    initials: Option<&EncodedArtifact>,
) -> TextSubstitution {
    let mut result = TextSubstitution {
        text: text.to_string(),
        signature_replacements: 0,
        initials_replacements: 0,
    };

    for (role, artifact) in [
        (ArtifactRole::Signature, signature),
        (ArtifactRole::Initials, initials),
    ] {
        let Some(artifact) = artifact else {
            continue;
        };
        let replacement = fragment(role, artifact);

        let mut replaced = 0;
        for marker in markers_for(role) {
            let count = marker.pattern.find_iter(&result.text).count();
            if count == 0 {
                continue;
            }
            let next = marker
                .pattern
                .replace_all(&result.text, NoExpand(&replacement))
                .into_owned();
            result.text = next;
            replaced += count;
        }

        match role {
            ArtifactRole::Signature => result.signature_replacements = replaced,
            ArtifactRole::Initials => result.initials_replacements = replaced,
        }
    }

    result
}

/// Substitute artifacts into a document resource.
///
/// The output is always re-encoded in the canonical percent form, even when
/// nothing was replaced. A resource that cannot be decoded is returned
/// unchanged; this fallback is logged and never surfaces as an error.
pub fn substitute(
    resource: &str,
    signature: Option<&EncodedArtifact>,
    initials: Option<&EncodedArtifact>,
) -> SubstitutionResult {
    let text = match codec::decode(resource) {
        Ok(text) => text,
        Err(err) => {
            match &err {
                CodecError::UnsupportedEncoding(_) => {
                    debug!(error = %err, "Document is not a text template, passing through")
                }
                CodecError::MalformedPayload { .. } => {
                    warn!(error = %err, "Document template could not be decoded, passing through")
                }
            }
            return SubstitutionResult {
                resource: resource.to_string(),
                signature_replacements: 0,
                initials_replacements: 0,
                passed_through: true,
            };
        }
    };

    let substituted = substitute_text(&text, signature, initials);
    debug!(
        signature_replacements = substituted.signature_replacements,
        initials_replacements = substituted.initials_replacements,
        "Placeholders substituted"
    );

    SubstitutionResult {
        resource: codec::encode(&substituted.text),
        signature_replacements: substituted.signature_replacements,
        initials_replacements: substituted.initials_replacements,
        passed_through: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::find_markers;

    fn signature() -> EncodedArtifact {
        EncodedArtifact::new("data:image/png;base64,U0lHTkFUVVJF", 400, 150)
    }

    fn initials() -> EncodedArtifact {
        EncodedArtifact::new("data:image/png;base64,SU5JVElBTFM=", 200, 100)
    }

    #[test]
    fn replaces_every_occurrence() {
        let text = "<p>Signature line</p><p>signature line</p><p>{{INITIAL}}</p>";
        let result = substitute_text(text, Some(&signature()), Some(&initials()));

        assert!(find_markers(&result.text).is_empty());
        assert_eq!(result.signature_replacements, 2);
        assert_eq!(result.initials_replacements, 1);
        assert_eq!(
            result.text.matches(&fragment(ArtifactRole::Signature, &signature())).count(),
            2
        );
        assert_eq!(
            result.text.matches(&fragment(ArtifactRole::Initials, &initials())).count(),
            1
        );
    }

    #[test]
    fn absent_role_keeps_its_markers() {
        let text = "Sign: {{SIGNATURE_LINE}} Initials: ____ (initial)";
        let result = substitute_text(text, Some(&signature()), None);

        let remaining = find_markers(&result.text);
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|m| m.role == ArtifactRole::Initials));
        assert_eq!(result.signature_replacements, 1);
        assert_eq!(result.initials_replacements, 0);
    }

    #[test]
    fn fragment_binds_role_width() {
        let sig = fragment(ArtifactRole::Signature, &signature());
        let ini = fragment(ArtifactRole::Initials, &initials());
        assert!(sig.contains("max-width:200px"));
        assert!(ini.contains("max-width:100px"));
        assert!(sig.contains(r#"src="data:image/png;base64,U0lHTkFUVVJF""#));
        assert!(sig.contains("border-bottom"));
    }

    #[test]
    fn no_artifacts_still_canonicalises() {
        let original = "data:text/html;base64,PHA+SW5pdGlhbDo8L3A+";
        let result = substitute(original, None, None);
        assert!(!result.passed_through);
        assert!(result.resource.starts_with(codec::PERCENT_PREFIX));
        assert_eq!(codec::decode(&result.resource).unwrap(), "<p>Initial:</p>");
        assert_eq!(result.replacements(ArtifactRole::Initials), 0);
    }

    #[test]
    fn unsupported_resource_passes_through() {
        let pdf = "data:application/pdf;base64,JVBERi0xLjcK";
        let result = substitute(pdf, Some(&signature()), Some(&initials()));
        assert!(result.passed_through);
        assert_eq!(result.resource, pdf);
        assert_eq!(result.signature_replacements, 0);
    }

    #[test]
    fn malformed_resource_passes_through() {
        let broken = "data:text/html;base64,!!!";
        let result = substitute(broken, Some(&signature()), None);
        assert!(result.passed_through);
        assert_eq!(result.resource, broken);
    }

    #[test]
    fn repeated_substitution_is_stable() {
        let resource = codec::encode("Signature line / Initials: / {{INITIALS}}");
        let once = substitute(&resource, Some(&signature()), Some(&initials()));
        let twice = substitute(&resource, Some(&signature()), Some(&initials()));
        assert_eq!(once, twice);

        let again = substitute(&once.resource, Some(&signature()), Some(&initials()));
        assert_eq!(again.resource, once.resource);
        assert_eq!(again.signature_replacements, 0);
    }
}
