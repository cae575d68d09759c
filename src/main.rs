//! Flowmap CLI - Deterministic variable-level dataflow snapshot tool
//!
//! Usage: flowmap <command> [arguments]

mod analyze_cmd;
mod cli;
mod diff_cmd;
mod history_cmd;
mod status_cmd;

use std::process::ExitCode;

use flowmap::{
    error_code, generate_execution_id, output_json, ErrorResponse, JsonResponse, OutputFormat,
};

use cli::Command;

/// Report a failure on the requested channel.
///
/// JSON mode emits a schema-versioned envelope carrying the stable
/// error code; human mode writes plain text to stderr.
fn report_error(err: &anyhow::Error, output_format: OutputFormat, usage: bool) {
    match output_format {
        OutputFormat::Json => {
            let execution_id = generate_execution_id();
            let response = JsonResponse::new(
                ErrorResponse {
                    error: error_code(err).to_string(),
                    message: format!("{:#}", err),
                },
                &execution_id,
            );
            if output_json(&response).is_err() {
                eprintln!("Error: {:#}", err);
            }
        }
        OutputFormat::Human => {
            eprintln!("Error: {:#}", err);
            if usage {
                cli::print_usage();
            }
        }
    }
}

fn main() -> ExitCode {
    // The format has to be known before parsing finishes, so parse
    // failures themselves can honor --output json.
    let args: Vec<String> = std::env::args().collect();
    let output_format = args
        .iter()
        .position(|arg| arg == "--output")
        .and_then(|i| args.get(i + 1))
        .and_then(|value| OutputFormat::from_str(value))
        .unwrap_or(OutputFormat::Human);

    let command = match cli::parse_args_impl(|| println!("{}", flowmap::version::version())) {
        Ok(command) => command,
        Err(e) => {
            report_error(&e, output_format, true);
            return ExitCode::from(1);
        }
    };

    let result = match command {
        Command::Analyze {
            files,
            root,
            language,
            clang_args,
            out,
            generated_at,
            output_format,
        } => analyze_cmd::run_analyze(
            files,
            root,
            language,
            clang_args,
            out,
            generated_at,
            output_format,
        ),
        Command::Diff {
            current,
            previous,
            file_filter,
            output_format,
        } => diff_cmd::run_diff(current, previous, file_filter, output_format),
        Command::History {
            repo,
            rev,
            files,
            out,
            list,
            output_format,
        } => history_cmd::run_history(repo, rev, files, out, list, output_format),
        Command::Status {
            snapshot,
            output_format,
        } => status_cmd::run_status(snapshot, output_format),
    };

    if let Err(e) = result {
        report_error(&e, output_format, false);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
