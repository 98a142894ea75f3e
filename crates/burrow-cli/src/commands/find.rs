//! Find command - list matching entries.

use crate::app::App;
use anyhow::Context;
use burrow_core::{
    Config, EntryKind, ErrorPolicy, FileFindInfo, OutputFormat, SearchOrder, SearchSpec,
};
use regex::Regex;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Command-line options of `burrow find`.
///
/// `None` means "use the configured default".
#[derive(Debug, Clone)]
pub struct FindOptions {
    pub path: PathBuf,
    pub pattern: Option<String>,
    pub regex: Option<String>,
    pub order: Option<SearchOrder>,
    pub kind: EntryKind,
    pub ignore_case: Option<bool>,
    pub skip_errors: bool,
    pub limit: Option<usize>,
    pub long: bool,
    pub output: Option<OutputFormat>,
}

/// Run the find command.
pub fn run(config: Config, options: FindOptions) -> anyhow::Result<()> {
    let app = App::new(config);
    let spec = build_spec(&app.config, &options)?;

    let limit = options.limit.unwrap_or(app.config.output.limit);
    let format = options.output.unwrap_or(app.config.output.format);
    let long = options.long || app.config.output.long;

    let start = Instant::now();
    let mut walk = app.finder.infos(spec);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut collected = Vec::new();
    let mut count = 0usize;

    for info in walk.by_ref() {
        let info = info?;
        match format {
            OutputFormat::Text => writeln!(out, "{}", format_line(&info, long))?,
            OutputFormat::Json => collected.push(info),
        }
        count += 1;
        if limit > 0 && count >= limit {
            break;
        }
    }
    walk.close();
    let elapsed = start.elapsed();

    match format {
        OutputFormat::Text => {
            eprintln!();
            eprintln!(
                "Found {} entries in {:.3}ms",
                count,
                elapsed.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&collected)?)?;
        }
    }

    Ok(())
}

/// Combine command-line options with configured defaults.
pub fn build_spec(config: &Config, options: &FindOptions) -> anyhow::Result<SearchSpec> {
    let order = options.order.unwrap_or(config.search.order);
    let ignore_case = options.ignore_case.unwrap_or(config.search.ignore_case);
    let (include_files, include_dirs) = options.kind.flags();

    let spec = match &options.regex {
        Some(expression) => {
            let source = if ignore_case {
                format!("(?i){}", expression)
            } else {
                expression.clone()
            };
            let regex = Regex::new(&source)
                .with_context(|| format!("invalid regular expression: {}", expression))?;
            SearchSpec::with_regex(
                &options.path,
                regex,
                include_files,
                include_dirs,
                order,
                ignore_case,
            )?
        }
        None => {
            let pattern = options
                .pattern
                .as_deref()
                .unwrap_or(&config.search.pattern);
            SearchSpec::new(
                &options.path,
                pattern,
                include_files,
                include_dirs,
                order,
                ignore_case,
            )?
        }
    };

    let policy = if options.skip_errors {
        ErrorPolicy::Skip
    } else {
        config.search.error_policy
    };
    Ok(spec.with_error_policy(policy))
}

/// One output line: the path, or a long listing line.
pub fn format_line(info: &FileFindInfo, long: bool) -> String {
    if !long {
        return info.full_path.display().to_string();
    }

    let kind = if info.is_reparse_point() {
        'l'
    } else if info.is_directory() {
        'd'
    } else {
        '-'
    };
    let modified = info
        .last_write_time()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));

    format!(
        "{} {:>12} {} {}",
        kind,
        info.size,
        modified,
        info.full_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::FileAttributes;

    fn options() -> FindOptions {
        FindOptions {
            path: PathBuf::from("/r"),
            pattern: None,
            regex: None,
            order: None,
            kind: EntryKind::All,
            ignore_case: None,
            skip_errors: false,
            limit: None,
            long: false,
            output: None,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let mut config = Config::default();
        config.search.pattern = "*.md".to_string();
        config.search.order = SearchOrder::AllDepths;
        config.search.ignore_case = true;

        let spec = build_spec(&config, &options()).unwrap();
        assert_eq!(spec.pattern(), "*.md");
        assert_eq!(spec.order(), SearchOrder::AllDepths);
        assert!(spec.is_match("README.MD"));
        assert_eq!(spec.error_policy(), ErrorPolicy::Abort);
    }

    #[test]
    fn test_options_override_config() {
        let config = Config::default();
        let mut opts = options();
        opts.pattern = Some("*.rs".to_string());
        opts.order = Some(SearchOrder::TopDirectoryOnly);
        opts.kind = EntryKind::Files;
        opts.ignore_case = Some(false);
        opts.skip_errors = true;

        let spec = build_spec(&config, &opts).unwrap();
        assert!(spec.is_match("main.rs"));
        assert!(!spec.is_match("MAIN.RS"));
        assert!(spec.include_files());
        assert!(!spec.include_dirs());
        assert_eq!(spec.error_policy(), ErrorPolicy::Skip);
    }

    #[test]
    fn test_regex_option() {
        let config = Config::default();
        let mut opts = options();
        opts.regex = Some("^lib.*\\.rs$".to_string());
        opts.ignore_case = Some(true);

        let spec = build_spec(&config, &opts).unwrap();
        assert!(spec.ignore_case());
        assert!(spec.is_match("LIB.rs"));
        assert!(!spec.is_match("main.rs"));

        opts.regex = Some("(".to_string());
        assert!(build_spec(&config, &opts).is_err());
    }

    #[test]
    fn test_rejected_combination() {
        let config = Config::default();
        let mut opts = options();
        opts.pattern = Some("*.rs".to_string());
        opts.order = Some(SearchOrder::AllSubdirectories);
        assert!(build_spec(&config, &opts).is_err());
    }

    #[test]
    fn test_format_line() {
        let info = FileFindInfo {
            full_path: PathBuf::from("/r/a.txt"),
            name: "a.txt".to_string(),
            size: 42,
            attributes: FileAttributes::ARCHIVE,
            creation_time_utc: None,
            last_access_time_utc: None,
            last_write_time_utc: None,
        };
        assert_eq!(format_line(&info, false), PathBuf::from("/r/a.txt").display().to_string());

        let line = format_line(&info, true);
        assert!(line.starts_with("-           42 "));
        assert!(line.ends_with("a.txt"));

        let dir = FileFindInfo {
            attributes: FileAttributes::DIRECTORY,
            ..info.clone()
        };
        assert!(format_line(&dir, true).starts_with('d'));

        let link = FileFindInfo {
            attributes: FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT,
            ..info
        };
        assert!(format_line(&link, true).starts_with('l'));
    }
}
