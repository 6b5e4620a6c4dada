/*!
 * Configuration handling for datahop
 */

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::chooser::UploadPriority;

/// Command-line arguments for datahop
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "datahop",
    version = env!("CARGO_PKG_VERSION"),
    about = "Store-and-forward depot manager for data files awaiting peer transfer",
    long_about = "Inspects and maintains a depot of packaged data files: shows depot and \
volume status, selects the next file for outbound transfer according to the configured \
upload priority, packages new payloads, and reclaims space by evicting stale partial \
transfers."
)]
pub struct Args {
    /// Base storage directory containing the depot
    #[clap(default_value = ".")]
    pub base_dir: String,

    /// Path to the settings file (defaults to the per-user config location)
    #[clap(long)]
    pub settings: Option<String>,

    /// Allow the depot to live on non-removable storage
    #[clap(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    pub allow_non_removable: bool,

    /// Mount point of the removable storage medium, if any
    #[clap(long)]
    pub removable_mount: Option<String>,

    /// Select the next file for transfer, bounded by this size in bytes
    #[clap(long, value_name = "BYTES")]
    pub next: Option<u64>,

    /// Reclaim space for this many bytes by evicting incomplete files
    #[clap(long, value_name = "BYTES")]
    pub reclaim: Option<u64>,

    /// File identity protected from eviction (the transfer in progress)
    #[clap(long, value_name = "FILE_ID", requires = "reclaim")]
    pub protect: Option<String>,

    /// Package a payload file into the depot
    #[clap(long, value_name = "PATH")]
    pub package: Option<String>,

    /// Origin UID stamped into packaged files
    #[clap(long, value_name = "UID", default_value = "local", requires = "package")]
    pub origin: String,

    /// Store this upload priority in the settings and exit
    #[clap(long, value_enum)]
    pub set_priority: Option<UploadPriority>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Base storage directory containing the depot
    pub base_dir: PathBuf,

    /// Settings file location, `None` for the per-user default
    pub settings_path: Option<PathBuf>,

    /// Whether the depot may live on non-removable storage
    pub allow_non_removable: bool,

    /// Mount point of the removable storage medium
    pub removable_mount: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            base_dir: PathBuf::from(&args.base_dir),
            settings_path: args.settings.as_ref().map(PathBuf::from),
            allow_non_removable: args.allow_non_removable,
            removable_mount: args.removable_mount.as_ref().map(PathBuf::from),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> io::Result<()> {
        if !self.base_dir.exists() || !self.base_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Base directory not found: {}", self.base_dir.display()),
            ));
        }

        if let Some(path) = &self.settings_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Settings directory not found: {}", parent.display()),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_non_removable_defaults_on_and_can_be_disabled() {
        let args = Args::try_parse_from(["datahop"]).unwrap();
        assert!(args.allow_non_removable);

        let args =
            Args::try_parse_from(["datahop", "--allow-non-removable", "false"]).unwrap();
        assert!(!args.allow_non_removable);

        let args =
            Args::try_parse_from(["datahop", "--allow-non-removable", "true", "/depot"]).unwrap();
        assert!(args.allow_non_removable);
        assert_eq!(args.base_dir, "/depot");
    }

    #[test]
    fn missing_base_dir_fails_validation() {
        let config = Config {
            base_dir: PathBuf::from("/definitely/not/here"),
            settings_path: None,
            allow_non_removable: true,
            removable_mount: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn existing_base_dir_passes_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            base_dir: dir.path().to_path_buf(),
            settings_path: None,
            allow_non_removable: true,
            removable_mount: None,
        };
        assert!(config.validate().is_ok());
    }
}
