//! CLI entry point for repolockr.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! Event handling and policy evaluation live in the `repolockr-app` crate.

mod serve;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use repolockr_app::{
    run_local_check, to_renderable, to_report, verdict_exit_code, LocalCheckInput,
};
use repolockr_render::{render_github_annotations, render_markdown};
use std::process::Command;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "repolockr",
    version,
    about = "Blocks pull requests that modify locked files"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the GitHub App webhook service.
    Serve(serve::ServeArgs),

    /// Evaluate a local config against a branch and a set of changed files.
    Check {
        /// Repository root; relative paths below resolve against it.
        #[arg(long, default_value = ".")]
        repo_root: Utf8PathBuf,

        /// Path to the repolockr config (a missing file locks nothing).
        #[arg(long, default_value = ".github/repolockr.yml")]
        config: Utf8PathBuf,

        /// Head branch of the change (matched against `branches.allow`).
        #[arg(long)]
        branch: String,

        /// A changed path; may be repeated.
        #[arg(long = "changed-file", value_name = "PATH")]
        changed_files: Vec<String>,

        /// File listing changed paths, one per line.
        #[arg(long, value_name = "FILE")]
        changed_files_from: Option<Utf8PathBuf>,

        /// Git base revision; changed files come from `git diff --name-only base..head`.
        #[arg(long, requires = "head")]
        base: Option<String>,

        /// Git head revision.
        #[arg(long, requires = "base")]
        head: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Annotations,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Serve(args) => serve::run(args),
        Commands::Check {
            repo_root,
            config,
            branch,
            changed_files,
            changed_files_from,
            base,
            head,
            format,
        } => {
            let mut files = changed_files;
            if let Some(path) = changed_files_from {
                files.extend(read_path_list(&repo_root.join(path))?);
            }
            if let (Some(base), Some(head)) = (base, head) {
                files.extend(
                    git_changed_files(&repo_root, &base, &head)
                        .context("git diff --name-only failed")?,
                );
            }
            cmd_check(&repo_root.join(config), &branch, files, format)
        }
    }
}

fn cmd_check(
    config_path: &Utf8Path,
    branch: &str,
    changed_files: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    // Missing config is allowed: nothing is locked.
    let config_text = std::fs::read_to_string(config_path).unwrap_or_default();

    let output = run_local_check(LocalCheckInput {
        config_text: &config_text,
        branch,
        changed_files,
    })
    .with_context(|| format!("check failed for config {config_path}"))?;

    match format {
        OutputFormat::Markdown => print!("{}", render_markdown(&to_renderable(&output))),
        OutputFormat::Annotations => {
            for annotation in render_github_annotations(&to_renderable(&output)) {
                println!("{annotation}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&to_report(&output, branch))
                .context("serialize report")?;
            println!("{json}");
        }
    }

    let code = verdict_exit_code(&output);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn read_path_list(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read changed files: {path}"))?;
    Ok(non_blank_lines(&text))
}

fn git_changed_files(repo_root: &Utf8Path, base: &str, head: &str) -> anyhow::Result<Vec<String>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["diff", "--name-only", &format!("{base}..{head}")])
        .output()
        .context("spawn git")?;

    if !output.status.success() {
        anyhow::bail!("git diff returned non-zero exit status");
    }

    Ok(non_blank_lines(&String::from_utf8_lossy(&output.stdout)))
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
