/*!
 * Command-line interface for datahop
 */

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use datahop::config::{Args, Config};
use datahop::packager::package_data_file;
use datahop::platform::{LocalDirectoryProvider, MountPointStorage};
use datahop::report::{files_table, format_file_size, storage_table};
use datahop::repository::DataFileRepository;
use datahop::settings::{JsonSettingsStore, SettingsStore, UPLOAD_PRIORITY};
use datahop::storage::LocalVolume;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = Config::from_args(&args);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let settings: Box<dyn SettingsStore> = match &config.settings_path {
        Some(path) => Box::new(JsonSettingsStore::new(path)),
        None => Box::new(JsonSettingsStore::default_location()),
    };

    if let Some(priority) = args.set_priority {
        return match settings.set_string(UPLOAD_PRIORITY, &priority.to_string()) {
            Ok(()) => {
                println!("Upload priority set to {}", priority);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let repository = DataFileRepository::new(
        Box::new(LocalDirectoryProvider::new(
            &config.base_dir,
            config.allow_non_removable,
        )),
        Box::new(MountPointStorage::new(config.removable_mount.as_ref())),
        settings,
        Box::new(LocalVolume::new(&config.base_dir)),
    );

    match run(&args, &repository) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, repository: &DataFileRepository) -> datahop::error::Result<()> {
    if let Some(payload) = &args.package {
        let depot = repository.data_file_directory().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "depot directory is not available",
            )
        })?;
        let packaged = package_data_file(Path::new(payload), &depot, &args.origin)?;
        println!("Packaged as {}", packaged.name());
        return Ok(());
    }

    if let Some(max_file_size) = args.next {
        match repository.select_next_file_for_transfer(max_file_size)? {
            Some(file) => println!("{}", file.name()),
            None => println!("No file qualifies for transfer"),
        }
        return Ok(());
    }

    if let Some(target_size) = args.reclaim {
        let protected = args.protect.as_deref().unwrap_or("");
        let reclaimed = repository.delete_incomplete_files_for_space(protected, target_size)?;
        if reclaimed {
            println!("Enough space for {}", format_file_size(target_size));
        } else {
            println!(
                "Insufficient reclaimable space for {}",
                format_file_size(target_size)
            );
        }
        return Ok(());
    }

    // Default action: depot and volume status.
    let files = repository.data_files();
    if files.is_empty() {
        println!("Depot is empty");
    } else {
        println!("{}", files_table(&files));
    }
    println!("{}", storage_table(&repository.storage_snapshot()?));
    if !repository.can_receive_files() {
        println!("Warning: depot cannot currently receive files");
    }

    Ok(())
}
