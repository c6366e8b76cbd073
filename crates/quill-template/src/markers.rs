//! Placeholder marker table.
//!
//! Markers are a static list of (role, compiled pattern) pairs applied in
//! table order: every signature marker first, then every initials marker.
//! All patterns are case-insensitive.

use std::ops::Range;

use once_cell::sync::Lazy;
use quill_types::ArtifactRole;
use regex::Regex;

/// A recognised placeholder pattern
#[derive(Debug)]
pub struct Marker {
    pub role: ArtifactRole,
    pub name: &'static str,
    pub pattern: Regex,
}

/// One marker occurrence in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub role: ArtifactRole,
    pub marker: &'static str,
    pub range: Range<usize>,
}

static MARKERS: Lazy<Vec<Marker>> = Lazy::new(|| {
    vec![
        marker(ArtifactRole::Signature, "{{SIGNATURE_LINE}}", r"\{\{SIGNATURE_LINE\}\}"),
        marker(ArtifactRole::Signature, "Signature line", r"Signature line"),
        marker(ArtifactRole::Signature, "___ (signature)", r"_+\s*\(signature\)"),
        marker(ArtifactRole::Initials, "{{INITIALS}}", r"\{\{INITIALS\}\}"),
        marker(ArtifactRole::Initials, "{{INITIAL}}", r"\{\{INITIAL\}\}"),
        marker(ArtifactRole::Initials, "Initials:", r"Initials:"),
        marker(ArtifactRole::Initials, "Initial:", r"Initial:"),
        marker(ArtifactRole::Initials, "___ (initials)", r"_+\s*\(initials?\)"),
    ]
});

fn marker(role: ArtifactRole, name: &'static str, pattern: &str) -> Marker {
    Marker {
        role,
        name,
        pattern: Regex::new(&format!("(?i){}", pattern)).expect("marker pattern must compile"),
    }
}

/// Every marker, in application order.
pub fn markers() -> &'static [Marker] {
    &MARKERS
}

/// Markers for one role, in application order.
pub fn markers_for(role: ArtifactRole) -> impl Iterator<Item = &'static Marker> {
    MARKERS.iter().filter(move |marker| marker.role == role)
}

/// All marker occurrences in `text`, ordered by position.
pub fn find_markers(text: &str) -> Vec<MarkerMatch> {
    let mut found: Vec<MarkerMatch> = MARKERS
        .iter()
        .flat_map(|marker| {
            marker.pattern.find_iter(text).map(move |m| MarkerMatch {
                role: marker.role,
                marker: marker.name,
                range: m.range(),
            })
        })
        .collect();
    found.sort_by_key(|m| (m.range.start, m.range.end));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<&'static str> {
        find_markers(text).into_iter().map(|m| m.marker).collect()
    }

    #[test]
    fn table_orders_signature_before_initials() {
        let roles: Vec<_> = markers().iter().map(|m| m.role).collect();
        let first_initials = roles
            .iter()
            .position(|r| *r == ArtifactRole::Initials)
            .unwrap();
        assert!(roles[..first_initials]
            .iter()
            .all(|r| *r == ArtifactRole::Signature));
        assert!(roles[first_initials..]
            .iter()
            .all(|r| *r == ArtifactRole::Initials));
        assert_eq!(markers_for(ArtifactRole::Signature).count(), 3);
        assert_eq!(markers_for(ArtifactRole::Initials).count(), 5);
    }

    #[test]
    fn recognises_signature_variants() {
        assert_eq!(
            names("{{signature_line}} / SIGNATURE LINE / ____ (Signature)"),
            vec!["{{SIGNATURE_LINE}}", "Signature line", "___ (signature)"]
        );
    }

    #[test]
    fn recognises_initials_variants() {
        assert_eq!(
            names("{{INITIAL}} {{Initials}} initial: INITIALS: __(initial) _ (initials)"),
            vec![
                "{{INITIAL}}",
                "{{INITIALS}}",
                "Initial:",
                "Initials:",
                "___ (initials)",
                "___ (initials)",
            ]
        );
    }

    #[test]
    fn labels_need_their_punctuation() {
        assert!(find_markers("Initial here, Signature only, (signature)").is_empty());
    }

    #[test]
    fn match_ranges_point_at_marker_text() {
        let text = "Name: x  Initials: y";
        let found = find_markers(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.clone()], "Initials:");
        assert_eq!(found[0].role, ArtifactRole::Initials);
    }
}
