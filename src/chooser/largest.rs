//! Chooser preferring the largest file

use super::FileChooser;
use crate::datafile::DataFile;
use crate::error::Result;

/// Chooses the candidate with the greatest size in bytes
pub struct LargestFileChooser;

impl FileChooser for LargestFileChooser {
    fn choose(&self, data_files: &[DataFile]) -> Result<Option<DataFile>> {
        let mut candidates = data_files.iter();
        let Some(first) = candidates.next() else {
            return Ok(None);
        };

        let mut result = first;
        for candidate in candidates {
            // Strict comparison: the first candidate keeps its place on ties.
            if candidate.len() > result.len() {
                result = candidate;
            }
        }
        Ok(Some(result.clone()))
    }
}
