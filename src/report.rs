/*!
 * Depot status reporting
 *
 * Renders the current depot contents and volume state as console tables.
 */

use chrono::DateTime;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::datafile::DataFile;
use crate::storage::{StorageSnapshot, SAFETY_BUFFER};

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Render the depot contents as a table
pub fn files_table(files: &[DataFile]) -> String {
    #[derive(Tabled)]
    struct FileRow {
        #[tabled(rename = "File")]
        name: String,

        #[tabled(rename = "State")]
        state: String,

        #[tabled(rename = "Size")]
        size: String,

        #[tabled(rename = "Origin")]
        origin: String,

        #[tabled(rename = "Created")]
        created: String,
    }

    let rows: Vec<FileRow> = files
        .iter()
        .map(|file| {
            let created = file
                .creation_timestamp()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());

            FileRow {
                name: file.name(),
                state: if file.is_complete() {
                    "complete".to_string()
                } else {
                    "incomplete".to_string()
                },
                size: format_file_size(file.len()),
                origin: file.origin_uid().unwrap_or_else(|| "-".to_string()),
                created,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}

/// Render the volume snapshot as a table
pub fn storage_table(snapshot: &StorageSnapshot) -> String {
    #[derive(Tabled)]
    struct StorageRow {
        #[tabled(rename = "Metric")]
        key: String,

        #[tabled(rename = "Value")]
        value: String,
    }

    let rows = vec![
        StorageRow {
            key: "Total space".to_string(),
            value: format_file_size(snapshot.total_space()),
        },
        StorageRow {
            key: "Free space".to_string(),
            value: format_file_size(snapshot.free_space()),
        },
        StorageRow {
            key: "Incomplete files".to_string(),
            value: format_file_size(snapshot.incomplete_files_space()),
        },
        StorageRow {
            key: "Safety buffer".to_string(),
            value: format_file_size(SAFETY_BUFFER),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_format_with_binary_units() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
