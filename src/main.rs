use clap::{Parser, ValueEnum};
use content_model::act_many_to_many;
use log::{error, info, LevelFilter};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};
use thiserror::Error;

/// Prints the many-to-many association described by a file of pairs.
///
/// Each non-blank line not starting with `#` holds one pair, `left -> right`
/// by default.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File of pairs, one per line
    input: PathBuf,
    /// Text separating the two members of a pair
    #[arg(short, long, default_value = "->")]
    separator: String,
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::OFF,
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[derive(Debug, Error)]
enum RelateError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("line {line}: expected two members around the separator, got {text:?}")]
    Malformed { line: usize, text: String },
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

type Pairs = Vec<(String, String)>;
type Association = BTreeMap<String, BTreeSet<String>>;

fn pair_pattern(separator: &str) -> Result<Regex, RelateError> {
    let pattern = format!(r"^\s*(?P<a>.+?)\s*{}\s*(?P<b>.+?)\s*$", regex::escape(separator));
    Ok(Regex::new(&pattern)?)
}

fn parse_pairs(source: &str, separator: &str) -> Result<Pairs, RelateError> {
    let pattern = pair_pattern(separator)?;
    let mut pairs = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let captures = pattern
            .captures(trimmed)
            .ok_or_else(|| RelateError::Malformed {
                line: index + 1,
                text: text.to_string(),
            })?;
        pairs.push((captures["a"].to_string(), captures["b"].to_string()));
    }
    Ok(pairs)
}

fn relate(pairs: Pairs) -> (Association, Association) {
    let mut lefts = Association::new();
    let mut rights = Association::new();
    let sorted = |set: HashSet<String>| set.into_iter().collect::<BTreeSet<_>>();
    act_many_to_many(
        pairs,
        |left, rights_of_left| {
            lefts.insert(left, sorted(rights_of_left));
        },
        |right, lefts_of_right| {
            rights.insert(right, sorted(lefts_of_right));
        },
    );
    (lefts, rights)
}

fn print_association(title: &str, association: &Association) {
    println!("{title}:");
    for (member, related) in association {
        let related: Vec<&str> = related.iter().map(String::as_str).collect();
        println!("  {member}: {}", related.join(", "));
    }
}

fn init_logging(level: LogLevel) {
    colog::default_builder()
        .filter_level(LevelFilter::from(level))
        .init();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::level_filters::LevelFilter::from(level))
        .with_writer(io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("library tracing disabled: {err}");
    }
}

fn run(cli: Cli) -> Result<(), RelateError> {
    let source = fs::read_to_string(&cli.input).map_err(|source| RelateError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let pairs = parse_pairs(&source, &cli.separator)?;
    info!("read {} pairs from {}", pairs.len(), cli.input.display());

    let (lefts, rights) = relate(pairs);
    info!("{} left members, {} right members", lefts.len(), rights.len());
    print_association("left", &lefts);
    print_association("right", &rights);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_pairs_skipping_comments() {
        let source = "# authors\nann -> intro\n\n  bob->intro  \nann -> outro\n";
        let pairs = parse_pairs(source, "->").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("ann".to_string(), "intro".to_string()),
                ("bob".to_string(), "intro".to_string()),
                ("ann".to_string(), "outro".to_string()),
            ]
        );
    }

    #[test]
    fn separator_is_literal() {
        let pairs = parse_pairs("a.b | c.d", "|").unwrap();
        assert_eq!(pairs, vec![("a.b".to_string(), "c.d".to_string())]);
    }

    #[test]
    fn reports_malformed_line() {
        let err = parse_pairs("ok -> fine\nbroken", "->").unwrap_err();
        assert!(matches!(err, RelateError::Malformed { line: 2, .. }));
    }

    #[test]
    fn relates_both_sides() {
        let (lefts, rights) = relate(parse_pairs("a -> x\na -> y\nb -> x", "->").unwrap());
        assert_eq!(
            lefts["a"].iter().cloned().collect::<Vec<_>>(),
            vec!["x".to_string(), "y".to_string()]
        );
        assert_eq!(rights["x"].len(), 2);
    }
}
