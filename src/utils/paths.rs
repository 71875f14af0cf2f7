use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::{Component, Path};

/// Prefix every manifest path starts with.
pub const MANIFEST_PATH_PREFIX: &str = "./";

/// Decode bytes as UTF-8, dropping any sequence that is not valid.
///
/// Returns the decoded text and whether anything was dropped.
#[must_use]
pub fn decode_utf8_dropping(bytes: &[u8]) -> (String, bool) {
    let mut out = String::with_capacity(bytes.len());
    let mut dropped = false;

    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            dropped = true;
        }
    }

    (out, dropped)
}

/// Append `text` to `out`, escaping backslashes and control characters.
///
/// `\\`, `\t`, `\n` and `\r` use their short forms; every other control
/// character becomes `\xNN`. The result never contains a line break.
pub fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

/// Reverse [`escape_into`].
///
/// # Errors
///
/// Returns an error on a raw control character, a dangling backslash or an
/// unknown escape.
pub fn unescape_manifest_path(escaped: &str) -> Result<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();

    while let Some(c) = chars.next() {
        if c.is_ascii_control() {
            anyhow::bail!("Raw control character in path: {escaped:?}");
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let code = u8::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|code| hex.len() == 2 && code.is_ascii_control())
                    .with_context(|| format!("Invalid \\x escape in path: {escaped:?}"))?;
                out.push(char::from(code));
            }
            _ => anyhow::bail!("Invalid escape in path: {escaped:?}"),
        }
    }

    Ok(out)
}

/// Render a root-relative path the way it appears in a manifest.
///
/// Components are joined with `/` behind a `./` prefix and escaped with
/// [`escape_into`]. Bytes that are not valid UTF-8 are dropped unless
/// `strict` is set, in which case the path is rejected.
///
/// # Errors
///
/// Returns an error if `strict` is set and the path is not valid UTF-8, or if
/// the path is not a plain relative path.
pub fn to_manifest_path(relative: &Path, strict: bool) -> Result<String> {
    let mut rendered = String::from(MANIFEST_PATH_PREFIX);
    let mut first = true;

    for component in relative.components() {
        let part = match component {
            Component::Normal(part) => part,
            Component::CurDir => continue,
            _ => anyhow::bail!("Not a relative path: {}", relative.display()),
        };

        let (text, dropped) = decode_utf8_dropping(part.as_encoded_bytes());
        if dropped {
            if strict {
                anyhow::bail!("Path is not valid UTF-8: {}", relative.display());
            }
            tracing::debug!(path = %relative.display(), "Dropped non-UTF-8 bytes from path");
        }

        if !first {
            rendered.push('/');
        }
        escape_into(&text, &mut rendered);
        first = false;
    }

    Ok(rendered)
}
