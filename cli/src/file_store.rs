//! Credential store backed by a JSON object file.
//!
//! DESIGN
//! ======
//! Every operation re-reads the file so separate CLI invocations share one
//! session. Writes go to a sibling temp file and are renamed into place; on
//! unix the file is created `0600`. A missing file is an empty store. A file
//! that does not parse is also treated as empty (and logged), so a later
//! `login` overwrites it.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use portal::{CredentialStore, StoreError};

const CREDENTIALS_PATH_VAR: &str = "PORTAL_CREDENTIALS_PATH";

/// Resolve the credentials file: `PORTAL_CREDENTIALS_PATH`, else
/// `$HOME/.portal/credentials.json`, else `.portal/credentials.json`.
pub fn resolve_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CREDENTIALS_PATH_VAR).filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }
    let base = lookup("HOME").filter(|h| !h.is_empty()).map_or_else(PathBuf::new, PathBuf::from);
    base.join(".portal").join("credentials.json")
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "credentials file unreadable");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "credentials file is not a JSON object");
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, &e))?;
        }
        let rendered = serde_json::to_string_pretty(entries).map_err(|e| StoreError(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, rendered).map_err(|e| write_error(&tmp, &e))?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path).map_err(|e| write_error(&self.path, &e))
    }
}

fn write_error(path: &Path, e: &io::Error) -> StoreError {
    StoreError(format!("{}: {e}", path.display()))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| write_error(path, &e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load();
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}
