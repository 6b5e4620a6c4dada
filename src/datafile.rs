/*!
 * Data file representation
 *
 * A data file is a single entry in the depot directory: a zip-compatible
 * archive carrying one payload entry plus one `*.json` metadata entry. A
 * file still being received carries the incomplete suffix appended to the
 * name it will have once the transfer finishes.
 */

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, error};
use serde_json::Value;

use crate::error::{DatahopError, Result};

/// Suffix appended to the name of a file that is only partially transferred
pub const INCOMPLETE_FILE_APPENDIX: &str = "dhincomplete";
/// The incomplete suffix including its separating dot
const INCOMPLETE_SUFFIX: &str = ".dhincomplete";

/// Metadata key for the UID of the device the file originated from
pub const ORIGIN_UID: &str = "OriginUID";
/// Metadata key for the creation timestamp (epoch milliseconds)
pub const CREATION_TIMESTAMP: &str = "CreationTimestamp";
/// Metadata key for the original (pre-packaging) file name
pub const FILE_NAME: &str = "FileName";

/// A data file in the depot directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Create a data file handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a data file handle for a named entry inside a directory
    pub fn in_dir(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(name),
        }
    }

    /// Path of the data file on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name: the final path segment
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Whether the transfer of this file has finished
    ///
    /// A file is incomplete iff its name ends with the incomplete suffix.
    pub fn is_complete(&self) -> bool {
        let complete = !self.name().ends_with(INCOMPLETE_SUFFIX);
        debug!("Checking file {} (complete: {})", self.name(), complete);
        complete
    }

    /// Identity of the file: the display name with the incomplete suffix
    /// stripped. Complete and incomplete renditions of the same transfer
    /// share one identity.
    pub fn file_id(&self) -> String {
        let name = self.name();
        match name.strip_suffix(INCOMPLETE_SUFFIX) {
            Some(stripped) => stripped.to_string(),
            None => name,
        }
    }

    /// Whether this file's identity is exactly `file_id`
    pub fn matches_id(&self, file_id: &str) -> bool {
        self.file_id() == file_id
    }

    /// Name this file carries on the remote peer while mid-transfer
    pub fn remote_incomplete_name(&self) -> String {
        let mut remote_name = self.name();
        remote_name.push('.');
        remote_name.push_str(INCOMPLETE_FILE_APPENDIX);
        debug!("Remote incomplete data file name: {}", remote_name);
        remote_name
    }

    /// Size of the file in bytes, 0 if it cannot be read
    pub fn len(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the file is empty or unreadable
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last modification time, epoch if it cannot be read
    pub fn modified(&self) -> SystemTime {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// Remove the file from disk
    pub fn delete(&self) -> std::io::Result<()> {
        fs::remove_file(&self.path)
    }

    /// Creation timestamp of the file, in epoch milliseconds, read from
    /// metadata.
    ///
    /// Unlike the other metadata accessors this one propagates failures:
    /// callers comparing files by age must know when a timestamp is missing
    /// or malformed rather than silently ranking the file at zero.
    pub fn creation_timestamp(&self) -> Result<i64> {
        let value = self
            .metadata(CREATION_TIMESTAMP)
            .ok_or_else(|| DatahopError::MissingMetadata {
                key: CREATION_TIMESTAMP,
                file: self.name(),
            })?;
        value
            .parse::<i64>()
            .map_err(|source| DatahopError::InvalidTimestamp { value, source })
    }

    /// UID of the device this file originated from, if present in metadata
    pub fn origin_uid(&self) -> Option<String> {
        self.metadata(ORIGIN_UID)
    }

    /// Original name of the payload before packaging, if present in metadata
    pub fn original_file_name(&self) -> Option<String> {
        self.metadata(FILE_NAME)
    }

    /// Read one metadata value from the archive's `*.json` entry
    ///
    /// Best-effort: every failure (unopenable archive, no metadata entry,
    /// malformed JSON, absent key) is logged and surfaced as `None`. The
    /// archive is re-opened and the entry re-parsed on every call.
    pub fn metadata(&self, key: &str) -> Option<String> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                error!("Error occurred while opening {}: {}", self.name(), e);
                return None;
            }
        };

        let mut archive = match zip::ZipArchive::new(file) {
            Ok(archive) => archive,
            Err(e) => {
                error!("Error occurred while opening the zip file: {}", e);
                return None;
            }
        };

        // Scan the entries for the metadata file; first match wins.
        let metadata_index = (0..archive.len()).find(|&i| {
            archive
                .by_index(i)
                .map(|entry| entry.name().ends_with(".json"))
                .unwrap_or(false)
        });

        let Some(index) = metadata_index else {
            error!("No metadata file found in archive {}", self.name());
            return None;
        };

        let mut json = String::new();
        match archive.by_index(index) {
            Ok(mut entry) => {
                if let Err(e) = entry.read_to_string(&mut json) {
                    error!("Error occurred while reading the metadata file: {}", e);
                    return None;
                }
            }
            Err(e) => {
                error!("Error occurred while opening the metadata entry: {}", e);
                return None;
            }
        }

        let object: Value = match serde_json::from_str(&json) {
            Ok(object) => object,
            Err(e) => {
                error!("Error occurred while parsing the metadata file: {}", e);
                return None;
            }
        };

        match object.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            // Numeric values (e.g. a timestamp written as a JSON number)
            // stringify rather than failing the lookup.
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(_) | None => {
                error!("Metadata key '{}' not found in {}", key, self.name());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_constant_is_appendix_with_dot() {
        assert_eq!(INCOMPLETE_SUFFIX, format!(".{}", INCOMPLETE_FILE_APPENDIX));
    }

    #[test]
    fn complete_file_does_not_carry_suffix() {
        let file = DataFile::new("/depot/report.pdf");
        assert!(file.is_complete());
        assert_eq!(file.file_id(), "report.pdf");
    }

    #[test]
    fn incomplete_file_is_detected_and_stripped() {
        let file = DataFile::new("/depot/report.pdf.dhincomplete");
        assert!(!file.is_complete());
        assert_eq!(file.file_id(), "report.pdf");
    }

    #[test]
    fn identity_match_is_exact_after_stripping() {
        let file = DataFile::new("/depot/photo10.jpg.dhincomplete");
        assert!(file.matches_id("photo10.jpg"));
        // A shorter identity that is merely a prefix must not match.
        assert!(!file.matches_id("photo1"));
    }

    #[test]
    fn remote_incomplete_name_appends_suffix() {
        let file = DataFile::new("/depot/report.pdf");
        assert_eq!(file.remote_incomplete_name(), "report.pdf.dhincomplete");
    }

    #[test]
    fn missing_file_has_zero_length() {
        let file = DataFile::new("/depot/does-not-exist");
        assert_eq!(file.len(), 0);
        assert!(file.is_empty());
    }

    #[test]
    fn metadata_on_non_archive_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.bin");
        std::fs::write(&path, b"not a zip").unwrap();

        let file = DataFile::new(path);
        assert_eq!(file.metadata(ORIGIN_UID), None);
        assert!(file.creation_timestamp().is_err());
    }
}
