// Command-line front end for binpatch.
//
// `create` and `patch` mirror the file helpers in `io`; `info` prints what a
// patch file contains. Errors map to distinct exit codes through
// `PatchError::exit_code`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::LevelFilter;

use crate::container;
use crate::engine::ApplyOptions;
use crate::error::PatchError;
use crate::io::{apply_file, create_file};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Appended to the source file name when `create` gets no output path.
const PATCH_SUFFIX: &str = "_patch.bin";
/// Appended to the source file name when `patch` gets no output path.
const PATCHED_SUFFIX: &str = "_patched.bin";

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Create and apply self-verifying binary patches.
#[derive(Parser, Debug)]
#[command(
    name = "binpatch",
    version,
    about = "Binary patch creator/applier",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create a patch that turns SOURCE into TARGET.
    Create(CreateArgs),
    /// Apply a patch to SOURCE.
    Patch(PatchArgs),
    /// Print the contents summary of a patch file.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Modified file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,

    /// Patch file to write (default: SOURCE_patch.bin).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Original file the patch was created from.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Patch file.
    #[arg(value_hint = ValueHint::FilePath)]
    patch: PathBuf,

    /// Output file (default: SOURCE_patched.bin).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Skip the SHA-1 check of the patched result.
    #[arg(long = "no-verify")]
    no_verify: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Patch file.
    #[arg(value_hint = ValueHint::FilePath)]
    patch: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Create,
    Patch,
    Info,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    verify: bool,
    /// Source file (`create`, `patch`).
    source_file: Option<PathBuf>,
    /// Second input: the target for `create`, the patch for `patch`/`info`.
    input_file: PathBuf,
    output_file: Option<PathBuf>,
}

/// `<path>` with `suffix` appended to its final component.
fn default_output(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn resolve_options(cli: Cli) -> Options {
    let quiet = cli.quiet;
    let verbose = cli.verbose.min(2);
    let force = cli.force;
    let json_output = cli.json_output;

    match cli.command {
        Cmd::Create(args) => Options {
            command: Command::Create,
            force,
            quiet,
            verbose,
            json_output,
            verify: true,
            output_file: Some(
                args.output
                    .unwrap_or_else(|| default_output(&args.source, PATCH_SUFFIX)),
            ),
            source_file: Some(args.source),
            input_file: args.target,
        },
        Cmd::Patch(args) => Options {
            command: Command::Patch,
            force,
            quiet,
            verbose,
            json_output,
            verify: !args.no_verify,
            output_file: Some(
                args.output
                    .unwrap_or_else(|| default_output(&args.source, PATCHED_SUFFIX)),
            ),
            source_file: Some(args.source),
            input_file: args.patch,
        },
        Cmd::Info(args) => Options {
            command: Command::Info,
            force,
            quiet,
            verbose,
            json_output,
            verify: false,
            source_file: None,
            input_file: args.patch,
            output_file: None,
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("binpatch".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

fn log_level(opts: &Options) -> LevelFilter {
    match (opts.quiet, opts.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Refuse to clobber an existing output unless `--force` was given.
fn check_output(opts: &Options) -> Result<&Path, i32> {
    let Some(path) = opts.output_file.as_deref() else {
        eprintln!("binpatch: no output file");
        return Err(1);
    };
    if path.exists() && !opts.force {
        eprintln!(
            "binpatch: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return Err(1);
    }
    Ok(path)
}

fn report_error(context: &str, e: &PatchError) -> i32 {
    eprintln!("binpatch: {context}: {e}");
    e.exit_code()
}

fn emit_json(json: &serde_json::Value) {
    match serde_json::to_string_pretty(json) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => log::warn!("could not render JSON stats: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Create command
// ---------------------------------------------------------------------------

fn cmd_create(opts: &Options) -> i32 {
    let Some(source) = opts.source_file.as_deref() else {
        eprintln!("binpatch: create requires a source file");
        return 1;
    };
    let output = match check_output(opts) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let stats = match create_file(source, &opts.input_file, output) {
        Ok(s) => s,
        Err(e) => return report_error("create", &e),
    };

    if !opts.quiet {
        println!("Saved patch to {}", output.display());
    }

    if opts.json_output {
        emit_json(&serde_json::json!({
            "command": "create",
            "source_size": stats.source_size,
            "target_size": stats.target_size,
            "patch_size": stats.patch_size,
            "replacements": stats.replacements,
            "addition_size": stats.addition_size,
            "source_sha1": stats.source_sha1.to_string(),
            "target_sha1": stats.target_sha1.to_string(),
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Patch command
// ---------------------------------------------------------------------------

fn cmd_patch(opts: &Options) -> i32 {
    let Some(source) = opts.source_file.as_deref() else {
        eprintln!("binpatch: patch requires a source file");
        return 1;
    };
    let output = match check_output(opts) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let apply_opts = ApplyOptions {
        verify: opts.verify,
    };
    let stats = match apply_file(source, &opts.input_file, output, &apply_opts) {
        Ok(s) => s,
        Err(e) => return report_error("patch", &e),
    };

    if !stats.verified {
        log::warn!("result not verified (--no-verify)");
    }
    if !opts.quiet {
        println!("Saved patched file to {}", output.display());
    }

    if opts.json_output {
        emit_json(&serde_json::json!({
            "command": "patch",
            "source_size": stats.source_size,
            "patch_size": stats.patch_size,
            "output_size": stats.output_size,
            "replacements": stats.replacements,
            "verified": stats.verified,
            "output_sha1": stats.output_sha1.to_string(),
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(opts: &Options) -> i32 {
    let bytes = match std::fs::read(&opts.input_file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("binpatch: {}: {e}", opts.input_file.display());
            return 1;
        }
    };
    let patch = match container::deserialize(&bytes) {
        Ok(p) => p,
        Err(e) => return report_error("info", &e),
    };
    let summary = patch.summary();

    if opts.json_output {
        emit_json(&serde_json::json!({
            "command": "info",
            "source_sha1": patch.source_digest().to_string(),
            "target_sha1": patch.target_digest().to_string(),
            "target_size": summary.target_size,
            "replacements": summary.replacement_count,
            "replaced_bytes": summary.replaced_bytes,
            "addition_size": summary.addition_len,
            "patch_size": summary.serialized_len,
        }));
    }

    if opts.quiet {
        return 0;
    }

    println!("Source SHA-1:                 {}", patch.source_digest());
    println!("Target SHA-1:                 {}", patch.target_digest());
    println!("Target size:                  {}", summary.target_size);
    println!("Replacement runs:             {}", summary.replacement_count);
    println!("Replaced bytes:               {}", summary.replaced_bytes);
    println!("Addition bytes:               {}", summary.addition_len);
    println!("Patch size:                   {}", summary.serialized_len);

    if opts.verbose > 0 {
        for run in patch.replacements() {
            println!("  {:#010x} +{}", run.offset(), run.data().len());
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::new()
        .filter_level(log_level(&opts))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Create => cmd_create(&opts),
        Command::Patch => cmd_patch(&opts),
        Command::Info => cmd_info(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
