//! CLI entry point for pkgguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `pkgguard-app` crate.

mod logging;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pkgguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, render_annotations,
    render_markdown, render_text, run_check, run_explain, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code, write_report,
};
use pkgguard_settings::Overrides;
use pkgguard_types::PkgguardReport;

#[derive(Parser, Debug)]
#[command(
    name = "pkgguard",
    version,
    about = "Dependency range consistency checks for package.json manifests"
)]
struct Cli {
    /// Directory containing the root package.json.
    #[arg(long, default_value = ".", global = true)]
    dir: Utf8PathBuf,

    /// Path to pkgguard config TOML, relative to --dir. A missing file means defaults.
    #[arg(long, default_value = "pkgguard.toml", global = true)]
    config: Utf8PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the recommended checks (and configured extra checks).
    Check {
        /// Rewrite fixable ranges in package.json files.
        #[arg(long)]
        fix: bool,

        /// Output format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the JSON report to this path.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Check as a monorepo even if detection says otherwise.
        #[arg(long, conflicts_with = "no_workspace")]
        workspace: bool,

        /// Check only the root package.json.
        #[arg(long)]
        no_workspace: bool,

        /// Treat the (root) package as a library.
        #[arg(long, conflicts_with = "no_library")]
        library: bool,

        /// Treat the (root) package as an application.
        #[arg(long)]
        no_library: bool,

        /// Maximum number of annotations with `--format github`.
        #[arg(long, default_value = "10")]
        max_annotations: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "package.exact_versions") or code (e.g., "range_not_exact").
        identifier: String,
    },

    /// Print the JSON schema of pkgguard.toml.
    Schema,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
    Github,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    match &cli.cmd {
        Commands::Check {
            fix,
            format,
            report_out,
            workspace,
            no_workspace,
            library,
            no_library,
            max_annotations,
        } => {
            let overrides = Overrides {
                library: flag_pair(*library, *no_library),
                fix: fix.then_some(true),
                workspace: flag_pair(*workspace, *no_workspace),
            };
            cmd_check(&cli, overrides, *format, report_out.as_deref(), *max_annotations)
        }
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Schema => cmd_schema(),
    }
}

fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn cmd_check(
    cli: &Cli,
    overrides: Overrides,
    format: Format,
    report_out: Option<&Utf8Path>,
    max_annotations: usize,
) -> anyhow::Result<()> {
    let dir = cli
        .dir
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.dir.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !dir.exists() {
            anyhow::bail!("directory does not exist: {}", dir);
        }
        let cfg_text = read_config(&dir.join(&cli.config))?;

        let output = run_check(CheckInput {
            dir: &dir,
            config_text: &cfg_text,
            overrides,
        })?;

        if let Some(path) = report_out {
            write_report(path, &output.report).context("write report json")?;
        }
        print_report(&output.report, format, max_annotations)?;

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            if let Some(path) = report_out {
                let report = runtime_error_report(&format!("{err:#}"));
                let _ = write_report(path, &report);
            }
            eprintln!("pkgguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Missing config is allowed (defaults apply); any other read failure is an error.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(config = %path, "no config file, using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config {path}")),
    }
}

fn print_report(
    report: &PkgguardReport,
    format: Format,
    max_annotations: usize,
) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            let bytes = serialize_report(report)?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Format::Text => print!("{}", render_text(&to_renderable(report))),
        Format::Markdown => print!("{}", render_markdown(&to_renderable(report))),
        Format::Github => {
            for line in render_annotations(&to_renderable(report), max_annotations) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = pkgguard_settings::config_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_pairs_map_to_overrides() {
        assert_eq!(flag_pair(false, false), None);
        assert_eq!(flag_pair(true, false), Some(true));
        assert_eq!(flag_pair(false, true), Some(false));
    }

    #[test]
    fn cli_parses_check_flags() {
        let cli = Cli::try_parse_from([
            "pkgguard",
            "--dir",
            "web",
            "check",
            "--fix",
            "--format",
            "github",
            "--no-workspace",
        ])
        .expect("parse");
        assert_eq!(cli.dir, Utf8PathBuf::from("web"));
        match cli.cmd {
            Commands::Check {
                fix,
                format,
                no_workspace,
                max_annotations,
                ..
            } => {
                assert!(fix);
                assert_eq!(format, Format::Github);
                assert!(no_workspace);
                assert_eq!(max_annotations, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(
            Cli::try_parse_from(["pkgguard", "check", "--library", "--no-library"]).is_err()
        );
    }

    #[test]
    fn missing_config_reads_as_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("pkgguard.toml")).expect("utf8");
        assert_eq!(read_config(&path).expect("read"), "");
    }
}
