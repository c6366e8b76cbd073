//! Encoding and decoding of self-contained document resources.
//!
//! The scheme is detected from the resource prefix only, never by sniffing
//! the payload. Encoding always produces the percent form.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CodecError, CodecResult};

/// Canonical prefix of a percent-encoded HTML resource.
pub const PERCENT_PREFIX: &str = "data:text/html;charset=utf-8,";

/// Percent-encoded form without an explicit charset, accepted on input.
pub const PERCENT_PREFIX_BARE: &str = "data:text/html,";

/// Prefix of a base64 HTML resource.
pub const BASE64_PREFIX: &str = "data:text/html;base64,";

/// Longest prefix preview carried in an `UnsupportedEncoding` error.
const PREVIEW_LEN: usize = 32;

/// The two supported resource forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScheme {
    PercentText,
    Base64Text,
}

impl ResourceScheme {
    /// Detect the scheme of `resource` and split off its payload.
    pub fn detect(resource: &str) -> Option<(Self, &str)> {
        if let Some(payload) = strip_prefix_ignore_case(resource, BASE64_PREFIX) {
            return Some((ResourceScheme::Base64Text, payload));
        }
        strip_prefix_ignore_case(resource, PERCENT_PREFIX)
            .or_else(|| strip_prefix_ignore_case(resource, PERCENT_PREFIX_BARE))
            .map(|payload| (ResourceScheme::PercentText, payload))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceScheme::PercentText => "percent-text",
            ResourceScheme::Base64Text => "base64-text",
        }
    }
}

impl fmt::Display for ResourceScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a document resource into its HTML text.
pub fn decode(resource: &str) -> CodecResult<String> {
    match ResourceScheme::detect(resource) {
        Some((scheme @ ResourceScheme::PercentText, payload)) => urlencoding::decode(payload)
            .map(|text| text.into_owned())
            .map_err(|err| malformed(scheme, err)),
        Some((scheme @ ResourceScheme::Base64Text, payload)) => {
            let compact: String = payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|err| malformed(scheme, err))?;
            String::from_utf8(bytes).map_err(|err| malformed(scheme, err))
        }
        None => Err(CodecError::UnsupportedEncoding(preview(resource))),
    }
}

/// Encode HTML text as a canonical percent-form resource.
pub fn encode(text: &str) -> String {
    let payload = urlencoding::encode(text);
    let mut resource = String::with_capacity(PERCENT_PREFIX.len() + payload.len());
    resource.push_str(PERCENT_PREFIX);
    resource.push_str(&payload);
    resource
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

fn malformed(scheme: ResourceScheme, err: impl fmt::Display) -> CodecError {
    CodecError::MalformedPayload {
        scheme: scheme.as_str(),
        reason: err.to_string(),
    }
}

fn preview(resource: &str) -> String {
    match resource.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &resource[..idx]),
        None => resource.to_string(),
    }
}
