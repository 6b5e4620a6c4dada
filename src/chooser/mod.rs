//! File selection strategies for outbound transfer
//!
//! One chooser is active at a time, resolved from the configured upload
//! priority. All four strategies share the same contract: given a candidate
//! slice they return one file, `None` only when the slice is empty, and on
//! equal ranking the first candidate encountered keeps its place.

pub mod largest;
pub mod newest;
pub mod oldest;
pub mod smallest;

use clap::ValueEnum;
use log::{debug, error};
use strum::{Display, EnumString};

pub use largest::LargestFileChooser;
pub use newest::NewestFileChooser;
pub use oldest::OldestFileChooser;
pub use smallest::SmallestFileChooser;

use crate::datafile::DataFile;
use crate::error::{DatahopError, Result};
use crate::settings::{SettingsStore, UPLOAD_PRIORITY};

/// Strategy choosing one data file out of a candidate set
pub trait FileChooser {
    /// Choose a file according to the implementer's criteria
    ///
    /// Returns `None` only if `data_files` is empty. Never mutates the
    /// candidates.
    fn choose(&self, data_files: &[DataFile]) -> Result<Option<DataFile>>;
}

/// Configured ordering of outbound transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadPriority {
    LargestFirst,
    NewestFirst,
    OldestFirst,
    #[default]
    SmallestFirst,
}

impl UploadPriority {
    /// Read the configured priority, initializing the setting to the
    /// default on first use
    ///
    /// The write-back is deliberate: after the first read the store always
    /// holds an explicit value, so later reconfiguration tooling sees what
    /// the depot is actually doing.
    pub fn load_or_init(settings: &dyn SettingsStore) -> Result<Self> {
        let stored = settings.get_string(UPLOAD_PRIORITY).map_err(|e| {
            error!("Error while getting the configuration for upload priority: {}", e);
            e
        })?;
        debug!("Given upload priority setting is {:?}", stored);

        match stored {
            None => {
                let default = UploadPriority::default();
                settings.set_string(UPLOAD_PRIORITY, &default.to_string())?;
                Ok(default)
            }
            Some(value) => value.parse::<UploadPriority>().map_err(|e| {
                error!("The given upload priority value is unexpected: {}", value);
                DatahopError::invalid_configuration_caused_by(
                    format!("invalid upload priority value '{}'", value),
                    e,
                )
            }),
        }
    }

    /// The chooser implementing this priority
    pub fn chooser(self) -> Box<dyn FileChooser> {
        match self {
            UploadPriority::LargestFirst => Box::new(LargestFileChooser),
            UploadPriority::NewestFirst => Box::new(NewestFileChooser),
            UploadPriority::OldestFirst => Box::new(OldestFileChooser),
            UploadPriority::SmallestFirst => Box::new(SmallestFileChooser),
        }
    }
}

/// Resolve the chooser for the configured upload priority
pub fn create_file_chooser(settings: &dyn SettingsStore) -> Result<Box<dyn FileChooser>> {
    let priority = UploadPriority::load_or_init(settings)?;
    debug!("Given upload priority is {}", priority);
    Ok(priority.chooser())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::JsonSettingsStore;

    #[test]
    fn priority_names_match_the_wire_format() {
        assert_eq!(UploadPriority::LargestFirst.to_string(), "LARGEST_FIRST");
        assert_eq!(UploadPriority::SmallestFirst.to_string(), "SMALLEST_FIRST");
        assert_eq!(
            "NEWEST_FIRST".parse::<UploadPriority>().unwrap(),
            UploadPriority::NewestFirst
        );
        assert!("FIFO".parse::<UploadPriority>().is_err());
    }

    #[test]
    fn first_load_writes_back_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));

        let priority = UploadPriority::load_or_init(&store).unwrap();
        assert_eq!(priority, UploadPriority::SmallestFirst);
        assert_eq!(
            store.get_string(UPLOAD_PRIORITY).unwrap().as_deref(),
            Some("SMALLEST_FIRST")
        );
    }

    #[test]
    fn unrecognized_stored_priority_is_invalid_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));
        store.set_string(UPLOAD_PRIORITY, "ROUND_ROBIN").unwrap();

        let err = UploadPriority::load_or_init(&store).unwrap_err();
        match err {
            DatahopError::InvalidConfiguration { source, .. } => {
                assert!(source.is_some(), "decode error must be attached as cause");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn stored_priority_resolves_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));
        store.set_string(UPLOAD_PRIORITY, "OLDEST_FIRST").unwrap();

        let priority = UploadPriority::load_or_init(&store).unwrap();
        assert_eq!(priority, UploadPriority::OldestFirst);
    }
}
