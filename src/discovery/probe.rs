//! Structural check for SDK-style project files
//!
//! A candidate is kept only when its root element is `<Project>` and that
//! element carries an `Sdk` attribute (any value). Legacy non-SDK projects,
//! unrelated XML files that happen to end in `proj`, and malformed files are
//! all discarded.
//!
//! Files are decoded the way an XML reader would: a byte order mark wins,
//! then the `encoding` of the XML declaration, then UTF-8.

use super::error::ProbeError;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use roxmltree::Document;
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

fn declared_encoding_regex() -> &'static Regex {
    static DECLARED: OnceLock<Regex> = OnceLock::new();
    DECLARED.get_or_init(|| {
        Regex::new(r#"\A<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
            .expect("valid regex")
    })
}

/// Encoding named by the XML declaration, if any and if known.
///
/// A declaration readable as ASCII cannot be UTF-16, so such labels map to
/// UTF-8 here.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let label = declared_encoding_regex().captures(bytes)?.get(1)?;
    Encoding::for_label(label.as_bytes()).map(Encoding::output_encoding)
}

/// Decodes raw project file bytes into text.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, ProbeError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(ProbeError::Encoding(encoding.name()))
}

/// Reads `path` and reports whether it is an SDK-style project.
///
/// `Ok(false)` means well-formed but not an SDK project. `Err` means the file
/// could not be read, decoded or parsed; callers treat it as a discard plus
/// diagnostic.
pub fn probe(path: &Path) -> Result<bool, ProbeError> {
    let bytes = std::fs::read(path)?;
    probe_content(&decode(&bytes)?)
}

pub fn probe_content(content: &str) -> Result<bool, ProbeError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let doc = Document::parse(content)?;
    let root = doc.root_element();

    Ok(root.tag_name().name() == "Project" && root.attribute("Sdk").is_some())
}
