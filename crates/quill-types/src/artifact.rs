//! Ink artifact roles and their encoded form

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a captured ink drawing plays in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactRole {
    Signature,
    Initials,
}

impl ArtifactRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactRole::Signature => "signature",
            ArtifactRole::Initials => "initials",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portable, self-contained image of one ink surface.
///
/// `data_uri` can be placed directly in an HTML `img` source attribute.
/// The surface dimensions travel with it so the ink threshold can be
/// measured against the blank baseline of the same surface size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedArtifact {
    data_uri: String,
    width: u32,
    height: u32,
}

impl EncodedArtifact {
    pub fn new(data_uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            data_uri: data_uri.into(),
            width,
            height,
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Length of the encoded payload in characters.
    pub fn len(&self) -> usize {
        self.data_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
