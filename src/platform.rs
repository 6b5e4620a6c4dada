/*!
 * Platform collaborators the depot core calls into
 *
 * Directory resolution and removable-storage detection are environment
 * concerns, kept behind traits so the repository can run against a plain
 * local directory in production and against temp directories in tests.
 */

use std::path::{Path, PathBuf};

use log::warn;

/// Resolves named storage areas to filesystem directories
pub trait DirectoryProvider {
    /// Directory for the named storage area, `None` if it is currently
    /// unavailable (e.g. the backing volume is unmounted)
    fn file_directory(&self, name: &str) -> Option<PathBuf>;

    /// Whether the depot may live on non-removable storage
    fn is_non_removable_storage_allowed(&self) -> bool;
}

/// Detects whether the removable storage medium is present
pub trait RemovableStorage {
    fn is_removable_storage_available(&self) -> bool;
}

/// Directory provider rooted at a base path on local storage
pub struct LocalDirectoryProvider {
    base: PathBuf,
    allow_non_removable: bool,
}

impl LocalDirectoryProvider {
    pub fn new(base: impl Into<PathBuf>, allow_non_removable: bool) -> Self {
        Self {
            base: base.into(),
            allow_non_removable,
        }
    }
}

impl DirectoryProvider for LocalDirectoryProvider {
    fn file_directory(&self, name: &str) -> Option<PathBuf> {
        let dir = self.base.join(name);
        if dir.is_dir() {
            Some(dir)
        } else {
            warn!("Storage area '{}' is not available at {}", name, dir.display());
            None
        }
    }

    fn is_non_removable_storage_allowed(&self) -> bool {
        self.allow_non_removable
    }
}

/// Removable storage keyed on the presence of a mount point
pub struct MountPointStorage {
    mount_point: Option<PathBuf>,
}

impl MountPointStorage {
    pub fn new(mount_point: Option<impl Into<PathBuf>>) -> Self {
        Self {
            mount_point: mount_point.map(Into::into),
        }
    }
}

impl RemovableStorage for MountPointStorage {
    fn is_removable_storage_available(&self) -> bool {
        match &self.mount_point {
            Some(mount) => Path::new(mount).is_dir(),
            None => false,
        }
    }
}
