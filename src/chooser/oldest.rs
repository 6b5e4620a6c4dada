//! Chooser preferring the earliest created file

use super::FileChooser;
use crate::datafile::DataFile;
use crate::error::Result;

/// Chooses the candidate with the smallest creation timestamp
///
/// Shares the metadata fragility of [`super::NewestFileChooser`]: a
/// candidate without a valid creation timestamp fails the whole choice.
pub struct OldestFileChooser;

impl FileChooser for OldestFileChooser {
    fn choose(&self, data_files: &[DataFile]) -> Result<Option<DataFile>> {
        let mut candidates = data_files.iter();
        let Some(first) = candidates.next() else {
            return Ok(None);
        };

        let mut result = first;
        let mut result_timestamp = first.creation_timestamp()?;
        for candidate in candidates {
            let timestamp = candidate.creation_timestamp()?;
            if timestamp < result_timestamp {
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
        assert_eq!(OldestFileChooser.choose(&[]).unwrap(), None);
    }

    #[test]
    fn smallest_timestamp_wins() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_packaged_file(dir.path(), "a.zip", b"aa", "phone-1", 2_000),
            write_packaged_file(dir.path(), "b.zip", b"bb", "phone-1", 1_000),
            write_packaged_file(dir.path(), "c.zip", b"cc", "phone-2", 3_000),
        ];

        let chosen = OldestFileChooser.choose(&files).unwrap().unwrap();
        assert_eq!(chosen.name(), "b.zip");
    }

    #[test]
    fn first_candidate_wins_exact_ties() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_packaged_file(dir.path(), "a.zip", b"aa", "phone-1", 1_000),
            write_packaged_file(dir.path(), "b.zip", b"bb", "phone-2", 1_000),
        ];

        let chosen = OldestFileChooser.choose(&files).unwrap().unwrap();
        assert_eq!(chosen.name(), "a.zip");
    }
}
