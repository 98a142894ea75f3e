//! Bench command - compare a walk against plain `read_dir` recursion.

use crate::app::App;
use burrow_core::{Config, SearchOrder, SearchSpec};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of one timed walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkTiming {
    pub entries: usize,
    pub elapsed: Duration,
}

/// Run the bench command.
pub fn run(config: Config, path: &Path, pattern: &str, order: SearchOrder) -> anyhow::Result<()> {
    let app = App::new(config);
    let ignore_case = app.config.search.ignore_case;
    let spec = SearchSpec::new(path, pattern, true, true, order, ignore_case)?
        .with_error_policy(app.config.search.error_policy);

    println!("Burrow Walk Benchmark");
    println!("=====================");
    println!("  Root:    {}", path.display());
    println!("  Pattern: {}", pattern);
    println!("  Order:   {}", order);
    println!();

    let start = Instant::now();
    let mut entries = 0usize;
    for info in app.finder.infos(spec.clone()) {
        info?;
        entries += 1;
    }
    let burrow = WalkTiming {
        entries,
        elapsed: start.elapsed(),
    };

    let start = Instant::now();
    let entries = std_walk(&spec, path)?;
    let baseline = WalkTiming {
        entries,
        elapsed: start.elapsed(),
    };

    debug!(burrow = burrow.entries, baseline = baseline.entries, "Walks finished");

    print_timing("burrow", &burrow);
    print_timing("read_dir", &baseline);

    if burrow.entries != baseline.entries {
        eprintln!();
        eprintln!("Warning: entry counts differ (the tree may have changed between walks)");
    }
    if baseline.elapsed > Duration::ZERO {
        println!();
        println!(
            "  Ratio:   {:.2}x",
            burrow.elapsed.as_secs_f64() / baseline.elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn print_timing(label: &str, timing: &WalkTiming) {
    println!(
        "  {:<9}{:>10} entries in {:>10.3}ms",
        format!("{}:", label),
        timing.entries,
        timing.elapsed.as_secs_f64() * 1000.0
    );
}

/// Count what `spec` would yield using nothing but `std::fs::read_dir`.
///
/// Recursion follows the same rules as the library: real directories only,
/// and for `AllDepths` only those whose name matches.
pub fn std_walk(spec: &SearchSpec, root: &Path) -> anyhow::Result<usize> {
    let mut count = 0usize;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir != root => {
                debug!(path = %dir.display(), error = %e, "Failed to read directory");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let matched = spec.is_match(&name);
            let is_dir = file_type.is_dir()
                || (file_type.is_symlink()
                    && fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false));

            let included = if is_dir {
                spec.include_dirs()
            } else {
                spec.include_files()
            };
            if matched && included {
                count += 1;
            }

            // file_type() does not follow symlinks, so links are never entered
            let descend = match spec.order() {
                SearchOrder::TopDirectoryOnly => false,
                SearchOrder::AllDepths => matched,
                _ => true,
            };
            if descend && file_type.is_dir() {
                pending.push(entry.path());
            }
        }
    }

    Ok(count)
}
