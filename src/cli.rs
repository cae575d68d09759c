//! CLI argument parsing for flowmap
//!
//! Defines the Command enum and parse_args() function for all CLI commands.

use anyhow::Result;
use flowmap::{Language, OutputFormat};
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Flowmap - Variable-level dataflow snapshot tool");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  flowmap <command> [arguments]");
    eprintln!("  flowmap --help");
    eprintln!();
    eprintln!("  flowmap analyze (--file <PATH>)... [--root <DIR>] [--lang python|cpp] [--clang-arg <ARG>]... [--out <FILE>] [--output <FORMAT>]");
    eprintln!("  flowmap diff --current <FILE> [--previous <FILE>] [--file <PATTERN>] [--output <FORMAT>]");
    eprintln!("  flowmap history --repo <DIR> (--rev <REV> (--file <PATH>)... [--out <FILE>] | --list) [--output <FORMAT>]");
    eprintln!("  flowmap status --snapshot <FILE> [--output <FORMAT>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  analyze   Analyze source files and write a dataflow snapshot");
    eprintln!("  diff      Compare call-labeled dataflow edges between two snapshots");
    eprintln!("  history   Re-analyze files as they were at a git revision");
    eprintln!("  status    Show summary statistics for a snapshot");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default) or json");
    eprintln!();
    eprintln!("Analyze arguments:");
    eprintln!("  --file <PATH>       Source file to analyze (repeatable)");
    eprintln!("  --root <DIR>        Analyze every supported file under DIR; also relativizes paths");
    eprintln!("  --lang <LANG>       Force language: python or cpp (default: detect by extension)");
    eprintln!("  --clang-arg <ARG>   Extra compiler flag for C++ inputs (repeatable)");
    eprintln!("  --out <FILE>        Write the snapshot here (default: stdout summary only)");
    eprintln!("  --generated-at <TS> Pin the snapshot timestamp (for reproducible output)");
    eprintln!();
    eprintln!("Diff arguments:");
    eprintln!("  --current <FILE>    Current snapshot");
    eprintln!("  --previous <FILE>   Previous snapshot (omit to report everything as added)");
    eprintln!("  --file <PATTERN>    Only consider edges whose file path contains PATTERN");
    eprintln!();
    eprintln!("History arguments:");
    eprintln!("  --repo <DIR>        Git repository to read from");
    eprintln!("  --rev <REV>         Revision to analyze (any git revision spec)");
    eprintln!("  --file <PATH>       File to analyze at that revision (repeatable)");
    eprintln!("  --out <FILE>        Write the snapshot here");
    eprintln!("  --list              List commits reachable from HEAD instead of analyzing");
    eprintln!();
    eprintln!("Status arguments:");
    eprintln!("  --snapshot <FILE>   Snapshot to summarize");
}

#[derive(Debug)]
pub enum Command {
    Analyze {
        files: Vec<PathBuf>,
        root: Option<PathBuf>,
        language: Option<Language>,
        clang_args: Vec<String>,
        out: Option<PathBuf>,
        generated_at: Option<String>,
        output_format: OutputFormat,
    },
    Diff {
        current: PathBuf,
        previous: Option<PathBuf>,
        file_filter: Option<String>,
        output_format: OutputFormat,
    },
    History {
        repo: PathBuf,
        rev: Option<String>,
        files: Vec<PathBuf>,
        out: Option<PathBuf>,
        list: bool,
        output_format: OutputFormat,
    },
    Status {
        snapshot: PathBuf,
        output_format: OutputFormat,
    },
}

/// Parse CLI arguments into a Command
///
/// This function handles all CLI argument parsing for flowmap.
/// For the --version and -V flags, it prints the version and exits.
/// For the --help and -h flags, it prints usage and exits.
///
/// The version display is handled via a closure passed in to avoid
/// circular dependencies with the version module.
pub fn parse_args_impl<F>(print_version: F) -> Result<Command>
where
    F: FnOnce(),
{
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return Err(anyhow::anyhow!("Missing command"));
    }

    let command = &args[1];

    // Handle --version and -V flags
    if command == "--version" || command == "-V" {
        print_version();
        std::process::exit(0);
    }

    // Handle --help and -h flags
    if command == "--help" || command == "-h" {
        print_usage();
        std::process::exit(0);
    }

    parse_command(&args)
}

fn parse_output_format(value: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(value)
        .ok_or_else(|| anyhow::anyhow!("Invalid output format: {} (use human or json)", value))
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    if i + 1 >= args.len() {
        return Err(anyhow::anyhow!("{} requires an argument", flag));
    }
    Ok(&args[i + 1])
}

/// Parse a full argument vector (including argv[0] and the command word).
/// Split from the env wrapper so tests can drive it directly.
pub fn parse_command(args: &[String]) -> Result<Command> {
    let command = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("Missing command"))?;

    match command.as_str() {
        "analyze" => {
            let mut files: Vec<PathBuf> = Vec::new();
            let mut root: Option<PathBuf> = None;
            let mut language: Option<Language> = None;
            let mut clang_args: Vec<String> = Vec::new();
            let mut out: Option<PathBuf> = None;
            let mut generated_at: Option<String> = None;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--file" => {
                        files.push(PathBuf::from(flag_value(args, i, "--file")?));
                        i += 2;
                    }
                    "--root" => {
                        root = Some(PathBuf::from(flag_value(args, i, "--root")?));
                        i += 2;
                    }
                    "--lang" => {
                        let value = flag_value(args, i, "--lang")?;
                        language = Some(Language::from_str_arg(value).ok_or_else(|| {
                            anyhow::anyhow!("Invalid language: {} (use python or cpp)", value)
                        })?);
                        i += 2;
                    }
                    "--clang-arg" => {
                        clang_args.push(flag_value(args, i, "--clang-arg")?.to_string());
                        i += 2;
                    }
                    "--out" => {
                        out = Some(PathBuf::from(flag_value(args, i, "--out")?));
                        i += 2;
                    }
                    "--generated-at" => {
                        generated_at = Some(flag_value(args, i, "--generated-at")?.to_string());
                        i += 2;
                    }
                    "--output" => {
                        output_format = parse_output_format(flag_value(args, i, "--output")?)?;
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown argument for analyze: {}", other));
                    }
                }
            }

            if files.is_empty() && root.is_none() {
                return Err(anyhow::anyhow!("analyze requires --file or --root"));
            }

            Ok(Command::Analyze {
                files,
                root,
                language,
                clang_args,
                out,
                generated_at,
                output_format,
            })
        }
        "diff" => {
            let mut current: Option<PathBuf> = None;
            let mut previous: Option<PathBuf> = None;
            let mut file_filter: Option<String> = None;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--current" => {
                        current = Some(PathBuf::from(flag_value(args, i, "--current")?));
                        i += 2;
                    }
                    "--previous" => {
                        previous = Some(PathBuf::from(flag_value(args, i, "--previous")?));
                        i += 2;
                    }
                    "--file" => {
                        file_filter = Some(flag_value(args, i, "--file")?.to_string());
                        i += 2;
                    }
                    "--output" => {
                        output_format = parse_output_format(flag_value(args, i, "--output")?)?;
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown argument for diff: {}", other));
                    }
                }
            }

            let current = current.ok_or_else(|| anyhow::anyhow!("diff requires --current"))?;

            Ok(Command::Diff {
                current,
                previous,
                file_filter,
                output_format,
            })
        }
        "history" => {
            let mut repo: Option<PathBuf> = None;
            let mut rev: Option<String> = None;
            let mut files: Vec<PathBuf> = Vec::new();
            let mut out: Option<PathBuf> = None;
            let mut list = false;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--repo" => {
                        repo = Some(PathBuf::from(flag_value(args, i, "--repo")?));
                        i += 2;
                    }
                    "--rev" => {
                        rev = Some(flag_value(args, i, "--rev")?.to_string());
                        i += 2;
                    }
                    "--file" => {
                        files.push(PathBuf::from(flag_value(args, i, "--file")?));
                        i += 2;
                    }
                    "--out" => {
                        out = Some(PathBuf::from(flag_value(args, i, "--out")?));
                        i += 2;
                    }
                    "--list" => {
                        list = true;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output_format(flag_value(args, i, "--output")?)?;
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown argument for history: {}", other));
                    }
                }
            }

            let repo = repo.ok_or_else(|| anyhow::anyhow!("history requires --repo"))?;
            if !list {
                if rev.is_none() {
                    return Err(anyhow::anyhow!("history requires --rev or --list"));
                }
                if files.is_empty() {
                    return Err(anyhow::anyhow!("history requires at least one --file"));
                }
            }

            Ok(Command::History {
                repo,
                rev,
                files,
                out,
                list,
                output_format,
            })
        }
        "status" => {
            let mut snapshot: Option<PathBuf> = None;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--snapshot" => {
                        snapshot = Some(PathBuf::from(flag_value(args, i, "--snapshot")?));
                        i += 2;
                    }
                    "--output" => {
                        output_format = parse_output_format(flag_value(args, i, "--output")?)?;
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown argument for status: {}", other));
                    }
                }
            }

            let snapshot =
                snapshot.ok_or_else(|| anyhow::anyhow!("status requires --snapshot"))?;

            Ok(Command::Status {
                snapshot,
                output_format,
            })
        }
        other => Err(anyhow::anyhow!("Unknown command: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("flowmap")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_analyze_requires_input() {
        let err = parse_command(&argv(&["analyze"])).unwrap_err();
        assert!(err.to_string().contains("--file or --root"));
    }

    #[test]
    fn test_analyze_repeatable_file() {
        let cmd = parse_command(&argv(&["analyze", "--file", "a.py", "--file", "b.py"])).unwrap();
        match cmd {
            Command::Analyze { files, .. } => assert_eq!(files.len(), 2),
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_lang_and_output() {
        let cmd = parse_command(&argv(&[
            "analyze", "--file", "a.txt", "--lang", "python", "--output", "json",
        ]))
        .unwrap();
        match cmd {
            Command::Analyze {
                language,
                output_format,
                ..
            } => {
                assert_eq!(language, Some(Language::Python));
                assert_eq!(output_format, OutputFormat::Json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_rejects_bad_language() {
        let err =
            parse_command(&argv(&["analyze", "--file", "a.py", "--lang", "rust"])).unwrap_err();
        assert!(err.to_string().contains("Invalid language"));
    }

    #[test]
    fn test_diff_requires_current() {
        let err = parse_command(&argv(&["diff"])).unwrap_err();
        assert!(err.to_string().contains("--current"));
    }

    #[test]
    fn test_diff_optional_previous() {
        let cmd = parse_command(&argv(&["diff", "--current", "now.json"])).unwrap();
        match cmd {
            Command::Diff { previous, .. } => assert!(previous.is_none()),
            _ => panic!("expected diff"),
        }
    }

    #[test]
    fn test_history_list_needs_no_rev() {
        let cmd = parse_command(&argv(&["history", "--repo", ".", "--list"])).unwrap();
        match cmd {
            Command::History { list, rev, .. } => {
                assert!(list);
                assert!(rev.is_none());
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_history_rev_requires_file() {
        let err = parse_command(&argv(&["history", "--repo", ".", "--rev", "HEAD"])).unwrap_err();
        assert!(err.to_string().contains("--file"));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command(&argv(&["teleport"])).unwrap_err();
        assert!(err.to_string().contains("Unknown command"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = parse_command(&argv(&["status", "--snapshot", "s.json", "--frob"])).unwrap_err();
        assert!(err.to_string().contains("Unknown argument"));
    }
}
