//! Chooser preferring the smallest file

use super::FileChooser;
use crate::datafile::DataFile;
use crate::error::Result;

/// Chooses the candidate with the smallest size in bytes
pub struct SmallestFileChooser;

impl FileChooser for SmallestFileChooser {
    fn choose(&self, data_files: &[DataFile]) -> Result<Option<DataFile>> {
        let mut candidates = data_files.iter();
        let Some(first) = candidates.next() else {
            return Ok(None);
        };

        let mut result = first;
        for candidate in candidates {
            if candidate.len() < result.len() {
                result = candidate;
            }
        }
        Ok(Some(result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_candidates_choose_nothing() {
        assert_eq!(SmallestFileChooser.choose(&[]).unwrap(), None);
    }

    #[test]
    fn smallest_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for (name, size) in [("a.bin", 10), ("b.bin", 30), ("c.bin", 5)] {
            let path = dir.path().join(name);
            fs::write(&path, vec![0u8; size]).unwrap();
            files.push(DataFile::new(path));
        }

        let chosen = SmallestFileChooser.choose(&files).unwrap().unwrap();
        assert_eq!(chosen.name(), "c.bin");
    }

    #[test]
    fn duals_agree_when_all_sizes_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for (name, size) in [("a.bin", 10), ("b.bin", 30), ("c.bin", 5)] {
            let path = dir.path().join(name);
            fs::write(&path, vec![0u8; size]).unwrap();
            files.push(DataFile::new(path));
        }

        let smallest = SmallestFileChooser.choose(&files).unwrap().unwrap();
        let largest = super::super::LargestFileChooser
            .choose(&files)
            .unwrap()
            .unwrap();
        assert_ne!(smallest, largest);
        assert_eq!(smallest.name(), "c.bin");
        assert_eq!(largest.name(), "b.bin");
    }
}
