//! Empty command - check whether a directory has entries.

use crate::app::App;
use burrow_core::Config;
use std::path::Path;

/// Run the empty command.
///
/// Exits with status 1 when the directory is not empty, so the command can
/// be used in shell conditions.
pub fn run(config: Config, dir: &Path) -> anyhow::Result<()> {
    let app = App::new(config);

    if app.finder.is_directory_empty(dir)? {
        println!("{} is empty", dir.display());
        Ok(())
    } else {
        println!("{} is not empty", dir.display());
        std::process::exit(1);
    }
}
