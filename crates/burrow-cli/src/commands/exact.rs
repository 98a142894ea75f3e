//! Exact command - print the on-disk spelling of a path.

use crate::app::App;
use burrow_core::Config;
use std::path::Path;

/// Run the exact command.
pub fn run(config: Config, path: &Path) -> anyhow::Result<()> {
    let app = App::new(config);
    let exact = app.finder.exact_path(path)?;
    println!("{}", exact.display());
    Ok(())
}
