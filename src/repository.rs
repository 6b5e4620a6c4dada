/*!
 * The data file repository
 *
 * Query/command surface over the depot directory. Every listing is a fresh
 * directory read; no index is kept between calls, so the repository always
 * reflects what is on disk at the moment of the call.
 *
 * The repository takes no locks. Senders and receivers share the depot
 * under an external scheduler that serializes access at a coarser level;
 * callers needing stronger guarantees must wrap the repository in their own
 * serialization.
 */

use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::chooser::create_file_chooser;
use crate::datafile::DataFile;
use crate::error::Result;
use crate::platform::{DirectoryProvider, RemovableStorage};
use crate::settings::SettingsStore;
use crate::storage::{StorageSnapshot, VolumeStats};

/// Name of the storage area holding the depot
pub const DATA_FILE_DIRECTORY: &str = "data";

/// Repository over the depot directory
pub struct DataFileRepository {
    directories: Box<dyn DirectoryProvider>,
    removable_storage: Box<dyn RemovableStorage>,
    settings: Box<dyn SettingsStore>,
    volume: Box<dyn VolumeStats>,
}

impl DataFileRepository {
    /// Assemble a repository from its platform collaborators
    pub fn new(
        directories: Box<dyn DirectoryProvider>,
        removable_storage: Box<dyn RemovableStorage>,
        settings: Box<dyn SettingsStore>,
        volume: Box<dyn VolumeStats>,
    ) -> Self {
        Self {
            directories,
            removable_storage,
            settings,
            volume,
        }
    }

    /// The depot directory, `None` while its storage area is unavailable
    pub fn data_file_directory(&self) -> Option<PathBuf> {
        self.directories.file_directory(DATA_FILE_DIRECTORY)
    }

    /// All data files currently in the depot
    ///
    /// An unavailable depot directory yields an empty list, not an error.
    pub fn data_files(&self) -> Vec<DataFile> {
        let Some(dir) = self.data_file_directory() else {
            return Vec::new();
        };

        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| DataFile::new(entry.into_path()))
            .collect()
    }

    /// Data files whose transfer has finished
    pub fn complete_data_files(&self) -> Vec<DataFile> {
        self.data_files()
            .into_iter()
            .filter(DataFile::is_complete)
            .collect()
    }

    /// Data files still being received
    pub fn incomplete_data_files(&self) -> Vec<DataFile> {
        self.data_files()
            .into_iter()
            .filter(|file| !file.is_complete())
            .collect()
    }

    /// Complete data files strictly smaller than `max_file_size` bytes
    pub fn complete_data_files_under(&self, max_file_size: u64) -> Vec<DataFile> {
        self.data_files()
            .into_iter()
            .filter(|file| {
                let complete = file.is_complete();
                let fits = file.len() < max_file_size;
                debug!(
                    "File {}: complete: {}, length: {}, candidate: {}",
                    file.name(),
                    complete,
                    file.len(),
                    complete && fits
                );
                complete && fits
            })
            .collect()
    }

    /// Total size of all data files in bytes
    pub fn data_files_size(&self) -> u64 {
        self.data_files().iter().map(DataFile::len).sum()
    }

    /// Total size of incomplete data files in bytes
    pub fn incomplete_data_files_size(&self) -> u64 {
        self.incomplete_data_files().iter().map(DataFile::len).sum()
    }

    /// Whether at least one complete file is waiting to be sent
    pub fn has_files_to_send(&self) -> bool {
        let has_files = self.data_files().iter().any(DataFile::is_complete);
        if has_files {
            info!("There is a file to send");
        }
        has_files
    }

    /// Look a file up by its identity, complete or incomplete
    pub fn retrieve(&self, file_id: &str) -> Option<DataFile> {
        self.data_files()
            .into_iter()
            .find(|file| file.matches_id(file_id))
    }

    /// Select the file to be transferred next
    ///
    /// Filters the depot down to complete files under `max_file_size`, then
    /// delegates to the configured chooser. `None` when no file qualifies.
    pub fn select_next_file_for_transfer(&self, max_file_size: u64) -> Result<Option<DataFile>> {
        let data_files = self.data_files();
        info!("Number of files found: {}", data_files.len());
        if data_files.is_empty() {
            return Ok(None);
        }

        let candidates = self.complete_data_files_under(max_file_size);
        info!("Number of candidate files: {}", candidates.len());
        if candidates.is_empty() {
            return Ok(None);
        }

        let chooser = create_file_chooser(self.settings.as_ref())?;
        let selected = chooser.choose(&candidates)?;
        if let Some(file) = &selected {
            info!("Chosen file: {}", file.name());
        }
        Ok(selected)
    }

    /// Delete incomplete files, oldest first, until `target_size` bytes fit
    ///
    /// The file whose identity is `file_id` is the partial transfer about to
    /// resume and is never deleted. Space is re-checked against a fresh
    /// snapshot after every deletion. Returns `false` when every eligible
    /// file is gone and the target still does not fit; a file that cannot
    /// be deleted aborts the whole operation.
    pub fn delete_incomplete_files_for_space(
        &self,
        file_id: &str,
        target_size: u64,
    ) -> Result<bool> {
        if self.has_enough_space_available(target_size)? {
            return Ok(true);
        }

        let mut incomplete_data_files = self.incomplete_data_files();
        incomplete_data_files.sort_by_key(DataFile::modified);

        debug!("Deleting incomplete files to make space");
        for incomplete_data_file in incomplete_data_files {
            if incomplete_data_file.matches_id(file_id) {
                // The partial file we are about to continue receiving.
                continue;
            }

            incomplete_data_file.delete().map_err(|e| {
                let message =
                    format!("File {} could not be deleted", incomplete_data_file.name());
                warn!("{}: {}", message, e);
                io::Error::new(e.kind(), format!("{}: {}", message, e))
            })?;
            debug!("Deleted file {}", incomplete_data_file.name());

            if self.has_enough_space_available(target_size)? {
                debug!("We have enough space now");
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Capture the current state of the depot volume
    pub fn storage_snapshot(&self) -> Result<StorageSnapshot> {
        Ok(StorageSnapshot::new(
            self.volume.total_space()?,
            self.volume.free_space()?,
            self.incomplete_data_files_size(),
        ))
    }

    /// Whether `target_size` bytes fit on the volume, keeping the safety
    /// buffer free
    pub fn has_enough_space_available(&self, target_size: u64) -> Result<bool> {
        Ok(self.storage_snapshot()?.has_enough_space(target_size))
    }

    /// Whether the repository can currently store new incoming files
    pub fn can_receive_files(&self) -> bool {
        if self.directories.is_non_removable_storage_allowed() {
            return true;
        }

        let available = self.removable_storage.is_removable_storage_available();
        if !available {
            warn!("Removable storage is not currently available");
        }
        available
    }
}
