//! Info command - show the record of one entry.

use crate::app::App;
use burrow_core::{Config, FileAttributes, FileFindInfo};
use chrono::{DateTime, Local};
use std::path::Path;

/// Run the info command.
pub fn run(config: Config, path: &Path) -> anyhow::Result<()> {
    let app = App::new(config);

    let Some(info) = app.finder.info(path)? else {
        anyhow::bail!("{}: no such file or directory", path.display());
    };

    print!("{}", describe(&info));
    Ok(())
}

/// Multi-line description of one record.
pub fn describe(info: &FileFindInfo) -> String {
    let kind = if info.is_reparse_point() {
        "link"
    } else if info.is_directory() {
        "directory"
    } else {
        "file"
    };

    let mut text = String::new();
    text.push_str(&format!("Path:        {}\n", info.full_path.display()));
    text.push_str(&format!("Name:        {}\n", info.name));
    text.push_str(&format!("Kind:        {}\n", kind));
    text.push_str(&format!("Size:        {} bytes\n", info.size));
    text.push_str(&format!(
        "Attributes:  {} (0x{:04X})\n",
        attribute_flags(info.attributes),
        info.attributes.bits()
    ));
    text.push_str(&format!("Created:     {}\n", timestamp(info.creation_time())));
    text.push_str(&format!("Accessed:    {}\n", timestamp(info.last_access_time())));
    text.push_str(&format!("Modified:    {}\n", timestamp(info.last_write_time())));
    text
}

fn timestamp(time: Option<DateTime<Local>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Letter flags in the style of `attrib`.
fn attribute_flags(attributes: FileAttributes) -> String {
    [
        (FileAttributes::READONLY, 'R'),
        (FileAttributes::HIDDEN, 'H'),
        (FileAttributes::SYSTEM, 'S'),
        (FileAttributes::DIRECTORY, 'D'),
        (FileAttributes::ARCHIVE, 'A'),
        (FileAttributes::REPARSE_POINT, 'L'),
    ]
    .iter()
    .map(|&(flag, letter)| if attributes.contains(flag) { letter } else { '-' })
    .collect()
}
