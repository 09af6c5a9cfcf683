//! File-backed cache of rendered certificates.
//!
//! Every certificate is addressed by a [`CacheKey`] built from the sanitized
//! name and event. A file present at the key's path is served as-is; nothing
//! checks whether the template or font changed since it was written.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

const FILE_SUFFIX: &str = "_certificate.png";

/// Normalized `(name, event)` pair. Distinct inputs that sanitize to the same
/// tokens share a key, and therefore a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    event: Option<String>,
}

impl CacheKey {
    pub fn new(name: &str, event: Option<&str>) -> Self {
        Self {
            name: sanitize(name),
            event: event.map(sanitize),
        }
    }

    pub fn file_name(&self) -> String {
        match &self.event {
            Some(event) => format!("{}_{}{}", self.name, event, FILE_SUFFIX),
            None => format!("{}{}", self.name, FILE_SUFFIX),
        }
    }
}

/// Turns free text into a token that is safe to use as part of a file name.
///
/// Non-ASCII characters are dropped, path separators become spaces,
/// whitespace runs collapse to a single `_`, anything outside
/// `[A-Za-z0-9_.-]` is removed, and leading/trailing `.` or `_` are trimmed.
pub fn sanitize(input: &str) -> String {
    let ascii: String = input
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

pub struct CertificateStore {
    dir: PathBuf,
}

impl CertificateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Returns the cached file for `key`, if one has been stored.
    pub fn lookup(&self, key: &CacheKey) -> Option<PathBuf> {
        let path = self.path_for(key);
        path.is_file().then_some(path)
    }

    /// Writes `bytes` under `key`.
    ///
    /// The data lands in a temp file in the same directory and is renamed
    /// over the final path only once fully written, so readers never observe
    /// a partial certificate. Concurrent writers of one key: last rename wins.
    pub fn store(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(key);
        let mut tmp = tempfile::Builder::new()
            .prefix(".certificate-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}
