//! Digest line format: `<64 hex chars> *<name>`.

use treehash_core::{Digest, from_hex, to_hex};

/// One parsed digest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestLine {
    /// Expected root digest
    pub digest: Digest,
    /// Input identifier as written
    pub name: String,
}

/// Format the output line for a computed root digest.
#[must_use]
pub fn format_line(root: &Digest, name: &str) -> String {
    format!("{} *{}", to_hex(root), name)
}

/// Parse a digest line.
///
/// Accepts the binary-mode separator (`" *"`) and the text-mode one
/// (two spaces).
///
/// # Errors
///
/// Returns a description of the problem for malformed lines.
pub fn parse_line(line: &str) -> Result<DigestLine, String> {
    let line = line.trim_end_matches(['\r', '\n']);

    let (hex, rest) = line
        .split_once(' ')
        .ok_or_else(|| "missing separator".to_string())?;

    let name = rest
        .strip_prefix('*')
        .or_else(|| rest.strip_prefix(' '))
        .ok_or_else(|| "expected ' *' or two spaces after digest".to_string())?;

    if name.is_empty() {
        return Err("missing file name".to_string());
    }

    let digest = from_hex(hex).map_err(|e| e.to_string())?;

    Ok(DigestLine {
        digest,
        name: name.to_string(),
    })
}
