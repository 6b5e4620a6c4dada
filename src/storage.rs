/*!
 * Storage space accounting for the depot volume
 */

use std::io;
use std::path::PathBuf;

use log::debug;

/// Space kept free at all times, regardless of any single transfer's size.
/// Leaves headroom for filesystem metadata and other users of the volume.
pub const SAFETY_BUFFER: u64 = 100 * 1024 * 1024;

/// Read access to the statistics of the volume holding the depot
///
/// Behind a trait so that tests can substitute a volume with controlled
/// free space.
pub trait VolumeStats {
    /// Total capacity of the volume in bytes
    fn total_space(&self) -> io::Result<u64>;

    /// Currently available space on the volume in bytes
    fn free_space(&self) -> io::Result<u64>;
}

/// Volume statistics of the filesystem holding a local path
pub struct LocalVolume {
    path: PathBuf,
}

impl LocalVolume {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VolumeStats for LocalVolume {
    fn total_space(&self) -> io::Result<u64> {
        fs2::total_space(&self.path)
    }

    fn free_space(&self) -> io::Result<u64> {
        fs2::available_space(&self.path)
    }
}

/// Point-in-time reading of the depot volume
///
/// Immutable once captured. Space decisions must be made against a fresh
/// snapshot; a snapshot is never reused across eviction steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSnapshot {
    total_space: u64,
    free_space: u64,
    incomplete_files_space: u64,
}

impl StorageSnapshot {
    /// Build a snapshot from raw readings
    pub fn new(total_space: u64, free_space: u64, incomplete_files_space: u64) -> Self {
        Self {
            total_space,
            free_space,
            incomplete_files_space,
        }
    }

    /// Total capacity of the volume in bytes
    pub fn total_space(&self) -> u64 {
        self.total_space
    }

    /// Free space on the volume in bytes
    pub fn free_space(&self) -> u64 {
        self.free_space
    }

    /// Aggregate size of incomplete data files at capture time
    pub fn incomplete_files_space(&self) -> u64 {
        self.incomplete_files_space
    }

    /// Whether `target_size` bytes fit on the volume while keeping the
    /// safety buffer free
    pub fn has_enough_space(&self, target_size: u64) -> bool {
        debug!(
            "Free space: {}, safety buffer: {}, target size: {}",
            self.free_space, SAFETY_BUFFER, target_size
        );
        match self.free_space.checked_sub(SAFETY_BUFFER) {
            Some(headroom) => headroom >= target_size,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn target_within_buffered_free_space_fits() {
        let snapshot = StorageSnapshot::new(500 * MIB, 150 * MIB, 0);
        assert!(snapshot.has_enough_space(49 * MIB));
    }

    #[test]
    fn target_beyond_buffered_free_space_does_not_fit() {
        let snapshot = StorageSnapshot::new(500 * MIB, 150 * MIB, 0);
        assert!(!snapshot.has_enough_space(51 * MIB));
    }

    #[test]
    fn exact_boundary_fits() {
        let snapshot = StorageSnapshot::new(500 * MIB, 150 * MIB, 0);
        assert!(snapshot.has_enough_space(50 * MIB));
    }

    #[test]
    fn free_space_below_buffer_fits_nothing() {
        let snapshot = StorageSnapshot::new(500 * MIB, 50 * MIB, 0);
        assert!(!snapshot.has_enough_space(1));
        assert!(!snapshot.has_enough_space(0));
    }
}
