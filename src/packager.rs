/*!
 * Data file packaging
 *
 * Wraps a payload file into a depot archive: a zip holding the payload
 * entry plus a `metadata.json` entry with the origin UID, the creation
 * timestamp (epoch milliseconds) and the original file name. The packaged
 * file is named by the hex digest of its content so renames and duplicate
 * submissions are detectable.
 */

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;

use chrono::Utc;
use log::debug;
use serde_json::json;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::datafile::{DataFile, CREATION_TIMESTAMP, FILE_NAME, ORIGIN_UID};
use crate::error::Result;

/// Name of the metadata entry inside a packaged archive
const METADATA_ENTRY: &str = "metadata.json";

/// Package `payload` into the depot directory, stamping it with the
/// current time
pub fn package_data_file(payload: &Path, depot: &Path, origin_uid: &str) -> Result<DataFile> {
    package_data_file_at(payload, depot, origin_uid, Utc::now().timestamp_millis())
}

/// Package `payload` into the depot directory with an explicit creation
/// timestamp (epoch milliseconds)
pub fn package_data_file_at(
    payload: &Path,
    depot: &Path,
    origin_uid: &str,
    creation_timestamp: i64,
) -> Result<DataFile> {
    let payload_name = payload
        .file_name()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("payload path {} has no file name", payload.display()),
            )
        })?
        .to_string_lossy()
        .to_string();

    let metadata = json!({
        ORIGIN_UID: origin_uid,
        CREATION_TIMESTAMP: creation_timestamp,
        FILE_NAME: payload_name,
    });

    let mut buffer = Vec::new();
    {
        let mut archive = ZipWriter::new(Cursor::new(&mut buffer));
        // Fixed entry mtime keeps the content hash a function of payload
        // and metadata alone.
        let options = SimpleFileOptions::default().last_modified_time(zip::DateTime::default());

        archive.start_file(payload_name.as_str(), options)?;
        archive.write_all(&fs::read(payload)?)?;

        archive.start_file(METADATA_ENTRY, options)?;
        archive.write_all(serde_json::to_string(&metadata)?.as_bytes())?;

        archive.finish()?;
    }

    // The content hash doubles as the file identity in the depot.
    let digest = blake3::hash(&buffer).to_hex().to_string();
    let packaged_path = depot.join(&digest);
    let mut packaged = File::create(&packaged_path)?;
    packaged.write_all(&buffer)?;

    debug!(
        "Packaged {} as {} ({} bytes)",
        payload.display(),
        digest,
        buffer.len()
    );
    Ok(DataFile::new(packaged_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaged_metadata_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("sensor-log.txt");
        fs::write(&payload, b"entry 1\nentry 2\n").unwrap();

        let packaged =
            package_data_file_at(&payload, dir.path(), "phone-42", 1_341_792_000_000).unwrap();

        assert!(packaged.is_complete());
        assert_eq!(packaged.origin_uid().as_deref(), Some("phone-42"));
        assert_eq!(packaged.creation_timestamp().unwrap(), 1_341_792_000_000);
        assert_eq!(
            packaged.original_file_name().as_deref(),
            Some("sensor-log.txt")
        );
    }

    #[test]
    fn identical_payloads_package_to_the_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("frame.bin");
        fs::write(&payload, b"\x00\x01\x02").unwrap();

        let first =
            package_data_file_at(&payload, dir.path(), "phone-1", 1_000).unwrap();
        let second =
            package_data_file_at(&payload, dir.path(), "phone-1", 1_000).unwrap();
        assert_eq!(first.name(), second.name());
    }
}
