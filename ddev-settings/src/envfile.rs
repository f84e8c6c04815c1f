//! Lossless codec for `KEY=VALUE` files (`.env`, `.env.local`, `.env.php`).
//!
//! Users annotate these files, so the codec never normalizes anything it was
//! not asked to change: comments, blank lines, odd spacing and lines it does
//! not understand are kept byte for byte. Only assignments whose key is being
//! merged are rewritten.

use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::signature::SIGNATURE;
use ddev_core::error::Result;
use ddev_core::file_system::write_atomic;

/// One physical line. `newline` is the terminator as found ("\n", "\r\n" or
/// "" for a final unterminated line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvLine {
    /// Comment, blank line, or anything that is not an assignment.
    Raw { text: String, newline: String },
    Assignment {
        /// Everything up to and including `=` and any spaces after it.
        prefix: String,
        /// Left-hand side up to `=`, trimmed. `export FOO` is a key.
        key: String,
        /// Value text exactly as written, including quotes and trailing comment.
        raw_value: String,
        quoted: bool,
        newline: String,
    },
}

impl EnvLine {
    fn parse(line: &str) -> Self {
        let (body, newline) = split_newline(line);
        let trimmed = body.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return EnvLine::raw(body, newline);
        }
        let Some(eq) = body.find('=') else {
            return EnvLine::raw(body, newline);
        };
        let key = body[..eq].trim();
        if key.is_empty() || key.contains('#') {
            return EnvLine::raw(body, newline);
        }
        let after = &body[eq + 1..];
        let value_start = eq + 1 + (after.len() - after.trim_start_matches([' ', '\t']).len());
        let raw_value = &body[value_start..];
        EnvLine::Assignment {
            prefix: body[..value_start].to_string(),
            key: key.to_string(),
            raw_value: raw_value.to_string(),
            quoted: raw_value.starts_with('"') || raw_value.starts_with('\''),
            newline: newline.to_string(),
        }
    }

    fn raw(text: &str, newline: &str) -> Self {
        EnvLine::Raw {
            text: text.to_string(),
            newline: newline.to_string(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            EnvLine::Assignment { key, .. } => Some(key),
            EnvLine::Raw { .. } => None,
        }
    }

    fn newline(&self) -> &str {
        match self {
            EnvLine::Raw { newline, .. } | EnvLine::Assignment { newline, .. } => newline,
        }
    }

    fn set_newline(&mut self, nl: &str) {
        match self {
            EnvLine::Raw { newline, .. } | EnvLine::Assignment { newline, .. } => {
                *newline = nl.to_string()
            }
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, EnvLine::Raw { text, .. } if text.trim().is_empty())
    }

    fn write_to(&self, out: &mut String) {
        match self {
            EnvLine::Raw { text, newline } => {
                out.push_str(text);
                out.push_str(newline);
            }
            EnvLine::Assignment {
                prefix,
                raw_value,
                newline,
                ..
            } => {
                out.push_str(prefix);
                out.push_str(raw_value);
                out.push_str(newline);
            }
        }
    }
}

fn split_newline(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// In-memory env file: an ordered list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<EnvLine>,
}

impl EnvFile {
    /// Never fails; unrecognized lines are kept as raw text.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(EnvLine::parse).collect(),
        }
    }

    /// Exact inverse of [`EnvFile::parse`] for unmodified records.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            line.write_to(&mut out);
        }
        out
    }

    pub fn lines(&self) -> &[EnvLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Effective value of `key`: the last assignment wins, quotes removed.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines.iter().rev().find_map(|line| match line {
            EnvLine::Assignment { key: k, raw_value, .. } if k == key => Some(unquote(raw_value)),
            _ => None,
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lines.iter().any(|l| l.key() == Some(key))
    }

    pub fn has_signature(&self) -> bool {
        self.lines.iter().any(|line| match line {
            EnvLine::Raw { text, .. } => text.contains(SIGNATURE),
            _ => false,
        })
    }

    /// Prepend a signature comment so later runs recognise the file as ours.
    pub fn ensure_signature(&mut self) {
        if self.has_signature() {
            return;
        }
        // a shebang must stay on the first line
        let at = match self.lines.first_mut() {
            Some(EnvLine::Raw { text, newline }) if text.starts_with("#!") => {
                if newline.is_empty() {
                    newline.push('\n');
                }
                1
            }
            _ => 0,
        };
        self.lines.insert(
            at,
            EnvLine::raw(
                &format!("# {SIGNATURE}: created by ddev, remove this line to manage the file yourself"),
                "\n",
            ),
        );
    }

    /// Merge `values` into the record.
    ///
    /// Existing keys are rewritten in place at their first occurrence and later
    /// duplicates of those keys are dropped. New keys are appended in map
    /// order after a separating blank line. Lines for other keys are untouched.
    pub fn merge(&mut self, values: &IndexMap<String, String>) {
        let mut seen: Vec<&str> = Vec::new();
        let mut merged = Vec::with_capacity(self.lines.len() + values.len() + 1);

        for line in self.lines.drain(..) {
            let Some(key) = line.key() else {
                merged.push(line);
                continue;
            };
            let Some((known_key, value)) = values.get_key_value(key) else {
                merged.push(line);
                continue;
            };
            if seen.contains(&known_key.as_str()) {
                debug!(key = %known_key, "dropping duplicate assignment");
                continue;
            }
            seen.push(known_key.as_str());
            if let EnvLine::Assignment {
                prefix, newline, ..
            } = line
            {
                let raw_value = format_value(value);
                merged.push(EnvLine::Assignment {
                    quoted: raw_value.starts_with('"'),
                    prefix,
                    key: known_key.clone(),
                    raw_value,
                    newline,
                });
            }
        }

        let missing: Vec<(&String, &String)> = values
            .iter()
            .filter(|(k, _)| !seen.contains(&k.as_str()))
            .collect();

        if !missing.is_empty() {
            if let Some(last) = merged.last_mut() {
                if last.newline().is_empty() {
                    last.set_newline("\n");
                }
            }
            if merged.last().is_some_and(|l| !l.is_blank()) {
                merged.push(EnvLine::raw("", "\n"));
            }
            for (key, value) in missing {
                let raw_value = format_value(value);
                merged.push(EnvLine::Assignment {
                    prefix: format!("{key}="),
                    key: key.clone(),
                    quoted: raw_value.starts_with('"'),
                    raw_value,
                    newline: "\n".to_string(),
                });
            }
        }

        self.lines = merged;
    }
}

fn needs_quotes(value: &str) -> bool {
    value.chars().any(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '#' | '"' | '\'' | '\\' | '$' | '`' | ';' | '&' | '|' | '<' | '>' | '(' | ')'
                    | '*' | '?' | '!' | '{' | '}' | '[' | ']' | '~'
            )
    })
}

/// Render a value for the right-hand side of an assignment.
pub fn format_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim_end();
    if raw.len() >= 2 && raw.starts_with('"') {
        if let Some(end) = closing_quote(raw) {
            let mut out = String::new();
            let mut chars = raw[1..end].chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                        continue;
                    }
                }
                out.push(c);
            }
            return out;
        }
    }
    if raw.len() >= 2 && raw.starts_with('\'') {
        if let Some(end) = raw[1..].find('\'') {
            return raw[1..end + 1].to_string();
        }
    }
    // unquoted: a " #" starts a trailing comment
    match raw.find(" #") {
        Some(pos) => raw[..pos].trim_end().to_string(),
        None => raw.to_string(),
    }
}

fn closing_quote(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Read an env file. A missing file is `Ok(None)` so callers can branch on it.
pub fn read_env_file(path: &Path) -> Result<Option<EnvFile>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(EnvFile::parse(&text))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Merge `values` into `prior_text` (or an empty file) and write the result to `path`.
pub fn merge_and_write(
    path: &Path,
    values: &IndexMap<String, String>,
    prior_text: Option<&str>,
) -> Result<()> {
    let mut env = EnvFile::parse(prior_text.unwrap_or_default());
    env.merge(values);
    write_atomic(path, env.serialize().as_bytes())
}
