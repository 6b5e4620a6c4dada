//! Chooser preferring the most recently created file

use super::FileChooser;
use crate::datafile::DataFile;
use crate::error::Result;

/// Chooses the candidate with the greatest creation timestamp
///
/// Creation timestamps live in file metadata, so this chooser fails when
/// any candidate's metadata is missing or malformed.
pub struct NewestFileChooser;

impl FileChooser for NewestFileChooser {
    fn choose(&self, data_files: &[DataFile]) -> Result<Option<DataFile>> {
        let mut candidates = data_files.iter();
        let Some(first) = candidates.next() else {
            return Ok(None);
        };

        let mut result = first;
        let mut result_timestamp = first.creation_timestamp()?;
        for candidate in candidates {
            let timestamp = candidate.creation_timestamp()?;
            if timestamp > result_timestamp {
                result = candidate;
                result_timestamp = timestamp;
            }
        }
        Ok(Some(result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::write_packaged_file;

    #[test]
    fn empty_candidates_choose_nothing() {
        assert_eq!(NewestFileChooser.choose(&[]).unwrap(), None);
    }

    #[test]
    fn greatest_timestamp_wins() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_packaged_file(dir.path(), "a.zip", b"aa", "phone-1", 1_000),
            write_packaged_file(dir.path(), "b.zip", b"bb", "phone-1", 3_000),
            write_packaged_file(dir.path(), "c.zip", b"cc", "phone-2", 2_000),
        ];

        let chosen = NewestFileChooser.choose(&files).unwrap().unwrap();
        assert_eq!(chosen.name(), "b.zip");
    }

    #[test]
    fn malformed_candidate_metadata_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_packaged_file(dir.path(), "a.zip", b"aa", "phone-1", 1_000);
        let bad_path = dir.path().join("b.zip");
        std::fs::write(&bad_path, b"not an archive").unwrap();

        let result = NewestFileChooser.choose(&[good, DataFile::new(bad_path)]);
        assert!(result.is_err());
    }
}
