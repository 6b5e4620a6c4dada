/*!
 * datahop - Store-and-forward depot manager for data files awaiting peer transfer
 *
 * This library manages a flat directory of packaged data files moving
 * between devices over an unreliable, space-constrained channel: it
 * enumerates the depot, selects the next outbound file according to a
 * configurable priority, and reclaims space by evicting stale partial
 * transfers.
 */

pub mod chooser;
pub mod config;
pub mod datafile;
pub mod error;
pub mod packager;
pub mod platform;
pub mod report;
pub mod repository;
pub mod settings;
pub mod storage;


// Re-export main components for easier access
pub use chooser::{FileChooser, UploadPriority};
pub use config::Config;
pub use datafile::DataFile;
pub use error::{DatahopError, Result};
pub use repository::DataFileRepository;
pub use settings::{JsonSettingsStore, SettingsStore};
pub use storage::{StorageSnapshot, VolumeStats, SAFETY_BUFFER};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
