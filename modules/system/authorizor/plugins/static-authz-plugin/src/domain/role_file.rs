//! Role membership file.
//!
//! The file uses the Java properties syntax: `#` and `!` start comment lines,
//! key and value are separated by `=`, `:` or whitespace, a trailing
//! backslash continues the logical line, and `\t`, `\n`, `\r`, `\f`, `\uXXXX`
//! and escaped separators are recognised. Each value is a comma-separated
//! principal list; entries are trimmed and empty entries dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use svcgate_security::normalize_uid;

/// Errors raised while loading a role file.
#[derive(Debug, thiserror::Error)]
pub enum RoleFileError {
    #[error("cannot read role file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed role file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Role-to-members mapping loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct RoleFile {
    roles: HashMap<String, Vec<String>>,
}

impl RoleFile {
    /// Read and parse a role file.
    ///
    /// # Errors
    ///
    /// Returns [`RoleFileError::Io`] if the file cannot be read and
    /// [`RoleFileError::Malformed`] if it contains an invalid escape.
    pub fn load(path: &Path) -> Result<Self, RoleFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| RoleFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse role file text.
    ///
    /// A role listed more than once keeps its last definition.
    ///
    /// # Errors
    ///
    /// Returns [`RoleFileError::Malformed`] if the text contains an invalid
    /// `\u` escape.
    pub fn parse(text: &str) -> Result<Self, RoleFileError> {
        let mut roles = HashMap::new();
        for (line, logical) in logical_lines(text) {
            let (key, value) = split_entry(&logical);
            let role = unescape(key, line)?;
            let members = unescape(value, line)?
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .collect();
            roles.insert(role, members);
        }
        Ok(Self { roles })
    }

    #[must_use]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn members(&self, role: &str) -> Option<&[String]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    /// Whether `uid` is listed for `role`.
    ///
    /// An entry matches the full principal name or its name with realm and
    /// instance qualifiers stripped. A role without an entry matches nobody.
    #[must_use]
    pub fn is_member(&self, role: &str, uid: &str) -> bool {
        let short = normalize_uid(uid);
        self.members(role)
            .is_some_and(|members| members.iter().any(|m| m == uid || m == short))
    }
}

/// Join continuation lines and drop blanks and comments.
///
/// Yields the 1-based number of the first physical line of each entry.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start();
        let continuing = current.is_some();
        if !continuing && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!'))
        {
            continue;
        }

        let (body, continues) = strip_continuation(trimmed);
        let entry = current.get_or_insert_with(|| (idx + 1, String::new()));
        entry.1.push_str(body);

        if !continues {
            if let Some(done) = current.take() {
                out.push(done);
            }
        }
    }

    if let Some(done) = current.take() {
        out.push(done);
    }
    out
}

/// A line continues when it ends with an odd number of backslashes.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, RoleFileError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| RoleFileError::Malformed {
                        line,
                        reason: format!("invalid \\u escape '\\u{hex}'"),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
